//! Bomb factory - match shape to bomb kind, bomb to blast set
//!
//! Creation maps a resolved match (size, shape, swap direction) to the bomb
//! kind it spawns. Activation maps a bomb on the board to the set of cells
//! its blast covers. Chained detonation (a bomb caught inside another blast)
//! is the cascade engine's job, not this module's.

use match_board_types::{
    BombKind, Coord, Dir, PieceColor, BIG_BOMB_SIZE, DIRECTIONAL_BOMB_SIZE,
    NEIGHBOUR_BLAST_OFFSET,
};

use crate::grid::{Grid, Piece};
use crate::matcher::{is_corner_match, match_color};

/// Which bomb (if any) does this resolved match spawn?
///
/// Priority order:
/// 1. size >= 5, corner shape -> Neighbour
/// 2. size >= 5 -> Color
/// 3. size == 4, horizontal swap -> Row; vertical swap -> Column
/// 4. size == 3 -> none
///
/// A match with no resolvable color (all colorless) spawns nothing.
pub fn bomb_for_match(grid: &Grid, cells: &[Coord], swap_dir: Dir) -> Option<BombKind> {
    if match_color(grid, cells).is_none() {
        return None;
    }

    if cells.len() >= BIG_BOMB_SIZE {
        if is_corner_match(cells) {
            Some(BombKind::Neighbour)
        } else {
            Some(BombKind::Color)
        }
    } else if cells.len() == DIRECTIONAL_BOMB_SIZE {
        if swap_dir.is_horizontal() {
            Some(BombKind::Row)
        } else {
            Some(BombKind::Column)
        }
    } else {
        None
    }
}

/// The piece a freshly created bomb becomes
///
/// Row/Column/Neighbour bombs inherit the match color so they can re-match
/// and be cleared like ordinary pieces; a Color bomb stays colorless until a
/// swap assigns its target.
pub fn spawned_piece(kind: BombKind, match_color: Option<PieceColor>) -> Piece {
    match kind {
        BombKind::Color => Piece::bomb(kind, None),
        _ => Piece::bomb(kind, match_color),
    }
}

/// Every cell a bomb at (x, y) destroys when it goes off
///
/// For a Color bomb the target is the piece's own (assigned) color; plain
/// equality, so an unassigned target sweeps colorless pieces only. A
/// non-bomb piece has an empty blast.
pub fn blast_cells(grid: &Grid, x: i8, y: i8, piece: Piece) -> Vec<Coord> {
    match piece.bomb {
        Some(BombKind::Column) => grid.column_cells(x),
        Some(BombKind::Row) => grid.row_cells(y),
        Some(BombKind::Neighbour) => grid.neighbour_cells(x, y, NEIGHBOUR_BLAST_OFFSET),
        Some(BombKind::Color) => grid.cells_with_color(piece.color),
        None => Vec::new(),
    }
}
