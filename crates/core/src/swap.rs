//! Swap resolution - validate a player swap and work out what it triggers
//!
//! The resolver exchanges the two pieces provisionally, evaluates each
//! endpoint on the post-exchange grid, and either hands back the combined
//! clear set (plus any bombs the match shapes spawn) or undoes the exchange.
//! Movement animation is the presentation layer's problem; the resolver
//! reasons purely about final positions.

use arrayvec::ArrayVec;
use match_board_types::{BombKind, Coord, Dir};

use crate::bomb::{blast_cells, bomb_for_match, spawned_piece};
use crate::grid::{Grid, Piece};
use crate::matcher::{match_color, matches_at};

/// Why a swap request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRejection {
    /// A coordinate is off the board
    OutOfBounds,
    /// The cells are not grid-adjacent
    NotAdjacent,
    /// One of the cells holds no piece
    MissingPiece,
    /// The exchange produces no match and activates no bomb
    NoMatch,
    /// A cascade is running; swaps are only accepted while Idle
    Cascading,
    /// The move budget is spent
    MovesExhausted,
}

impl SwapRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapRejection::OutOfBounds => "outOfBounds",
            SwapRejection::NotAdjacent => "notAdjacent",
            SwapRejection::MissingPiece => "missingPiece",
            SwapRejection::NoMatch => "noMatch",
            SwapRejection::Cascading => "cascading",
            SwapRejection::MovesExhausted => "movesExhausted",
        }
    }
}

/// Result of resolving a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The swap was undone (or never applied); the grid is as before
    Rejected(SwapRejection),
    /// The swap stands; the cascade engine takes it from here
    Accepted {
        /// Union of both endpoints' match sets and bomb blast sets
        clear_set: Vec<Coord>,
        /// Bombs the match shapes spawn, one at most per endpoint,
        /// registered onto the board after the clear
        spawned: ArrayVec<(Coord, Piece), 2>,
    },
}

fn union_into(dst: &mut Vec<Coord>, src: Vec<Coord>) {
    for cell in src {
        if !dst.contains(&cell) {
            dst.push(cell);
        }
    }
}

/// Evaluate the cell at `at` after the exchange
///
/// `piece` is the piece now sitting there; `other` is the piece it swapped
/// with (pre-exchange copy). A Color bomb is armed with the other piece's
/// color before its blast is computed - each endpoint strictly from its own
/// bomb state. Returns (match set, blast set); at most one is non-empty.
fn evaluate_endpoint(
    grid: &mut Grid,
    at: Coord,
    piece: Piece,
    other: Piece,
) -> (Vec<Coord>, Vec<Coord>) {
    if piece.is_bomb() {
        let mut armed = piece;
        if armed.bomb == Some(BombKind::Color) {
            armed.color = other.color;
            // The assignment must be visible on the board: the blast keys off
            // the bomb's own color, and a chained re-detonation reads it too.
            grid.place_piece(armed, at.x, at.y);
        }
        (Vec::new(), blast_cells(grid, at.x, at.y, armed))
    } else {
        (matches_at(grid, at.x, at.y), Vec::new())
    }
}

/// Validate and resolve a swap between two cells
///
/// On rejection the grid is left exactly as it was. On acceptance the two
/// pieces stay exchanged and the caller receives the union clear set plus
/// any spawned bombs.
pub fn resolve_swap(grid: &mut Grid, a: Coord, b: Coord) -> SwapOutcome {
    if !grid.in_bounds(a.x, a.y) || !grid.in_bounds(b.x, b.y) {
        return SwapOutcome::Rejected(SwapRejection::OutOfBounds);
    }
    if !a.is_adjacent(b) {
        return SwapOutcome::Rejected(SwapRejection::NotAdjacent);
    }
    let (Some(piece_a), Some(piece_b)) = (grid.piece(a.x, a.y), grid.piece(b.x, b.y)) else {
        return SwapOutcome::Rejected(SwapRejection::MissingPiece);
    };

    // Provisional exchange.
    grid.place_piece(piece_b, a.x, a.y);
    grid.place_piece(piece_a, b.x, b.y);

    // Each endpoint is evaluated independently on the exchanged grid; the
    // piece now at `a` is the original `b` piece and vice versa.
    let (matches_at_a, blast_at_a) = evaluate_endpoint(grid, a, piece_b, piece_a);
    let (matches_at_b, blast_at_b) = evaluate_endpoint(grid, b, piece_a, piece_b);

    if matches_at_a.is_empty()
        && matches_at_b.is_empty()
        && blast_at_a.is_empty()
        && blast_at_b.is_empty()
    {
        // Dead swap: move the pieces back.
        grid.place_piece(piece_a, a.x, a.y);
        grid.place_piece(piece_b, b.x, b.y);
        return SwapOutcome::Rejected(SwapRejection::NoMatch);
    }

    let swap_dir = Dir::between(a, b).unwrap_or(Dir::Right);

    let mut spawned = ArrayVec::new();
    for (cell, match_set) in [(a, &matches_at_a), (b, &matches_at_b)] {
        if let Some(kind) = bomb_for_match(grid, match_set, swap_dir) {
            spawned.push((cell, spawned_piece(kind, match_color(grid, match_set))));
        }
    }

    let mut clear_set = matches_at_a;
    union_into(&mut clear_set, matches_at_b);
    union_into(&mut clear_set, blast_at_a);
    union_into(&mut clear_set, blast_at_b);

    SwapOutcome::Accepted { clear_set, spawned }
}
