//! Snapshot module - flat, copyable views of the board for observers
//!
//! A snapshot is plain data: numeric cell layers plus the counters an
//! external driver needs. The adapter serializes it onto the wire and tests
//! diff it; refreshing an existing snapshot reuses its buffers.

use match_board_types::TileKind;

use crate::cascade::{GameState, Phase};

/// Flat view of the whole simulation
///
/// All three layers are indexed `y * width + x`:
/// - `tiles`: [`TileKind::code`] per cell
/// - `break_values`: remaining hits for Breakable tiles, 0 elsewhere
/// - `colors`: 0 for empty/colorless, else [`PieceColor::code`](match_board_types::PieceColor::code)
/// - `bombs`: 0 for no bomb, else [`BombKind::code`](match_board_types::BombKind::code)
///
/// A cell is empty iff both its `colors` and `bombs` entries are 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub tiles: Vec<u8>,
    pub break_values: Vec<u8>,
    pub colors: Vec<u8>,
    pub bombs: Vec<u8>,
    pub phase: Phase,
    pub score: u32,
    pub moves_left: u32,
    pub cascade_level: u32,
    pub stable: bool,
    pub seed: u32,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            tiles: Vec::new(),
            break_values: Vec::new(),
            colors: Vec::new(),
            bombs: Vec::new(),
            phase: Phase::Idle,
            score: 0,
            moves_left: 0,
            cascade_level: 0,
            stable: true,
            seed: 0,
        }
    }
}

impl GameState {
    /// Refresh `out` in place from the current state
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        let grid = self.grid();
        let size = grid.width() as usize * grid.height() as usize;

        out.width = grid.width();
        out.height = grid.height();
        out.tiles.clear();
        out.tiles.resize(size, 0);
        out.break_values.clear();
        out.break_values.resize(size, 0);
        out.colors.clear();
        out.colors.resize(size, 0);
        out.bombs.clear();
        out.bombs.resize(size, 0);

        for y in 0..grid.height() as i8 {
            for x in 0..grid.width() as i8 {
                let idx = y as usize * grid.width() as usize + x as usize;
                if let Some(tile) = grid.tile(x, y) {
                    out.tiles[idx] = tile.kind().code();
                    if tile.kind() == TileKind::Breakable {
                        out.break_values[idx] = tile.break_value();
                    }
                }
                if let Some(piece) = grid.piece(x, y) {
                    out.colors[idx] = piece.color.map(|c| c.code()).unwrap_or(0);
                    out.bombs[idx] = piece.bomb.map(|b| b.code()).unwrap_or(0);
                }
            }
        }

        out.phase = self.phase();
        out.score = self.score();
        out.moves_left = self.moves_left();
        out.cascade_level = self.cascade_level();
        out.stable = !self.is_cascading();
        out.seed = self.seed();
    }

    /// Allocate a fresh snapshot of the current state
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut out = BoardSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, Piece, Tile};
    use match_board_types::{BombKind, PieceColor};

    #[test]
    fn test_snapshot_layers() {
        let mut grid = Grid::from_rows(&[
            "R.", //
            ".G",
        ]);
        grid.set_tile(0, 0, Tile::breakable(2));
        grid.place_piece(Piece::bomb(BombKind::Row, Some(PieceColor::Blue)), 1, 1);

        let state = GameState::from_grid(grid, 77);
        let snap = state.snapshot();

        assert_eq!(snap.width, 2);
        assert_eq!(snap.height, 2);
        assert_eq!(snap.tiles.len(), 4);

        // (0,0): empty cell on a breakable tile.
        assert_eq!(snap.tiles[0], 2);
        assert_eq!(snap.break_values[0], 2);
        assert_eq!(snap.colors[0], 0);
        assert_eq!(snap.bombs[0], 0);

        // (1,0): the green piece. Flat index = 0 * 2 + 1.
        assert_eq!(snap.colors[1], PieceColor::Green.code());

        // (0,1): the red piece. Flat index = 1 * 2 + 0.
        assert_eq!(snap.colors[2], PieceColor::Red.code());

        // (1,1): row bomb, blue. Flat index = 1 * 2 + 1.
        assert_eq!(snap.bombs[3], BombKind::Row.code());
        assert_eq!(snap.colors[3], PieceColor::Blue.code());

        assert!(snap.stable);
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.moves_left, state.moves_left());
    }

    #[test]
    fn test_snapshot_into_reuses_buffers() {
        let state = GameState::from_grid(Grid::new(4, 4), 1);
        let mut snap = BoardSnapshot::default();

        state.snapshot_into(&mut snap);
        let first = snap.clone();
        state.snapshot_into(&mut snap);
        assert_eq!(snap, first);
        assert_eq!(snap.tiles.len(), 16);
    }
}
