//! Grid module - the two parallel board layers
//!
//! The board is a `width x height` grid with a static tile layer and a piece
//! layer on top. Both layers use flat arrays for cache locality and to avoid
//! per-cell allocation during refill-heavy cascades.
//! Coordinates: (x, y) where x ranges left to right and y ranges bottom to
//! top (y grows toward the edge refill pieces drop in from).
//!
//! Out-of-bounds access is never an error: reads return `None`, writes return
//! `false` and leave the grid untouched. Callers probe speculative
//! coordinates (bomb blast centers near an edge) without pre-checking.

use match_board_types::{BombKind, Coord, PieceColor, TileKind};

/// A static board tile
///
/// Tiles never move. Breakable tiles count down to Normal as pieces clear on
/// top of them; Obstacle tiles never hold a piece at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    kind: TileKind,
    break_value: u8,
}

impl Tile {
    pub fn normal() -> Self {
        Self {
            kind: TileKind::Normal,
            break_value: 0,
        }
    }

    pub fn obstacle() -> Self {
        Self {
            kind: TileKind::Obstacle,
            break_value: 0,
        }
    }

    /// A breakable tile with the given number of hits remaining
    pub fn breakable(break_value: u8) -> Self {
        Self {
            kind: TileKind::Breakable,
            break_value,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn break_value(&self) -> u8 {
        self.break_value
    }

    /// Take one hit. At zero remaining the tile permanently becomes Normal.
    ///
    /// Returns the remaining break value. No-op for non-Breakable tiles.
    pub fn decay(&mut self) -> u8 {
        if self.kind != TileKind::Breakable {
            return self.break_value;
        }

        self.break_value = self.break_value.saturating_sub(1);
        if self.break_value == 0 {
            self.kind = TileKind::Normal;
        }
        self.break_value
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::normal()
    }
}

/// A game piece: an ordinary colored piece, or a bomb
///
/// `color == None` marks pieces that never take part in ordinary matches;
/// in practice that is a Color bomb before a swap assigns its target.
/// The `bomb` tag replaces subtype dispatch: callers branch on it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Option<PieceColor>,
    pub bomb: Option<BombKind>,
}

impl Piece {
    /// An ordinary piece of the given color
    pub fn normal(color: PieceColor) -> Self {
        Self {
            color: Some(color),
            bomb: None,
        }
    }

    /// A bomb piece; directional bombs usually carry the color of the match
    /// that created them, Color bombs start colorless
    pub fn bomb(kind: BombKind, color: Option<PieceColor>) -> Self {
        Self {
            color,
            bomb: Some(kind),
        }
    }

    pub fn is_bomb(&self) -> bool {
        self.bomb.is_some()
    }
}

/// The board grid: parallel tile and piece arenas
///
/// Single source of truth for cell occupancy. A piece lives in exactly one
/// cell; placing it elsewhere is the caller moving it, not the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array, index = y * width + x
    tiles: Vec<Tile>,
    /// Flat array, index = y * width + x
    pieces: Vec<Option<Piece>>,
}

impl Grid {
    /// Create an empty grid of Normal tiles
    pub fn new(width: u8, height: u8) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::normal(); size],
            pieces: vec![None; size],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// True iff (x, y) addresses a cell on the board
    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        self.index(x, y).is_some()
    }

    /// Tile at (x, y), or `None` out of bounds
    pub fn tile(&self, x: i8, y: i8) -> Option<Tile> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    /// Replace the tile at (x, y)
    ///
    /// Returns false (and does nothing) out of bounds.
    pub fn set_tile(&mut self, x: i8, y: i8, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Piece at (x, y), or `None` for an empty cell or out of bounds
    pub fn piece(&self, x: i8, y: i8) -> Option<Piece> {
        self.index(x, y).and_then(|idx| self.pieces[idx])
    }

    /// True iff the cell exists and holds a piece
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.piece(x, y).is_some()
    }

    /// Put a piece into the cell at (x, y), replacing any occupant
    ///
    /// Returns false (and does nothing) out of bounds. The arena slot is the
    /// piece's authoritative position; there is no per-piece coordinate to
    /// update separately.
    pub fn place_piece(&mut self, piece: Piece, x: i8, y: i8) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.pieces[idx] = Some(piece);
                true
            }
            None => false,
        }
    }

    /// Remove and return the piece at (x, y), leaving the cell empty
    ///
    /// What happens to the removed piece (scored, destroyed, re-placed) is
    /// the caller's business.
    pub fn clear_cell(&mut self, x: i8, y: i8) -> Option<Piece> {
        self.index(x, y).and_then(|idx| self.pieces[idx].take())
    }

    /// True iff the cell exists and its tile can hold a piece
    pub fn is_fillable(&self, x: i8, y: i8) -> bool {
        matches!(self.tile(x, y), Some(t) if t.kind() != TileKind::Obstacle)
    }

    /// Decay the tile at (x, y) if it is Breakable
    ///
    /// Returns the remaining break value when a Breakable tile was hit,
    /// `None` otherwise (including out of bounds).
    pub fn break_tile_at(&mut self, x: i8, y: i8) -> Option<u8> {
        let idx = self.index(x, y)?;
        if self.tiles[idx].kind() != TileKind::Breakable {
            return None;
        }
        Some(self.tiles[idx].decay())
    }

    /// Occupied cells of a whole row (tolerates out-of-range rows)
    pub fn row_cells(&self, y: i8) -> Vec<Coord> {
        let mut cells = Vec::new();
        for x in 0..self.width as i8 {
            if self.is_occupied(x, y) {
                cells.push(Coord::new(x, y));
            }
        }
        cells
    }

    /// Occupied cells of a whole column (tolerates out-of-range columns)
    pub fn column_cells(&self, x: i8) -> Vec<Coord> {
        let mut cells = Vec::new();
        for y in 0..self.height as i8 {
            if self.is_occupied(x, y) {
                cells.push(Coord::new(x, y));
            }
        }
        cells
    }

    /// Occupied cells of the square block centered on (x, y)
    ///
    /// The center may sit on the edge or off the board; out-of-range cells of
    /// the block are skipped.
    pub fn neighbour_cells(&self, x: i8, y: i8, offset: i8) -> Vec<Coord> {
        let mut cells = Vec::new();
        for bx in (x - offset)..=(x + offset) {
            for by in (y - offset)..=(y + offset) {
                if self.is_occupied(bx, by) {
                    cells.push(Coord::new(bx, by));
                }
            }
        }
        cells
    }

    /// Every occupied cell whose piece color equals `target`
    ///
    /// Plain equality: `target == None` sweeps colorless pieces (unassigned
    /// Color bombs), which is what a chained, never-swapped Color bomb hits.
    pub fn cells_with_color(&self, target: Option<PieceColor>) -> Vec<Coord> {
        let mut cells = Vec::new();
        for y in 0..self.height as i8 {
            for x in 0..self.width as i8 {
                if let Some(piece) = self.piece(x, y) {
                    if piece.color == target {
                        cells.push(Coord::new(x, y));
                    }
                }
            }
        }
        cells
    }

    /// Build a grid from visual rows (top row first), for tests and tools
    ///
    /// Cell characters: `.` empty, `#` obstacle, `Y`/`B`/`G`/`R`/`P` an
    /// ordinary piece of that color. Rows must share one length.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u8;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u8;
        let mut grid = Self::new(width, height);

        for (row_idx, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width as usize, "ragged row {}", row_idx);
            // Visual top row is the highest y.
            let y = (height as usize - 1 - row_idx) as i8;
            for (x, ch) in row.chars().enumerate() {
                let x = x as i8;
                match ch {
                    '.' => {}
                    '#' => {
                        grid.set_tile(x, y, Tile::obstacle());
                    }
                    _ => {
                        let color = match ch {
                            'Y' => PieceColor::Yellow,
                            'B' => PieceColor::Blue,
                            'G' => PieceColor::Green,
                            'R' => PieceColor::Red,
                            'P' => PieceColor::Purple,
                            _ => panic!("bad cell char {:?}", ch),
                        };
                        grid.place_piece(Piece::normal(color), x, y);
                    }
                }
            }
        }
        grid
    }

    /// Render the piece layer back to visual rows (top row first)
    pub fn as_rows(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.height as usize);
        for y in (0..self.height as i8).rev() {
            let mut row = String::with_capacity(self.width as usize);
            for x in 0..self.width as i8 {
                let ch = match (self.piece(x, y), self.tile(x, y)) {
                    (Some(piece), _) => match piece.color {
                        Some(PieceColor::Yellow) => 'Y',
                        Some(PieceColor::Blue) => 'B',
                        Some(PieceColor::Green) => 'G',
                        Some(PieceColor::Red) => 'R',
                        Some(PieceColor::Purple) => 'P',
                        None => '*',
                    },
                    (None, Some(t)) if t.kind() == TileKind::Obstacle => '#',
                    _ => '.',
                };
                row.push(ch);
            }
            rows.push(row);
        }
        rows
    }
}
