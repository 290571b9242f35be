//! Level layout - the in-memory description a board is built from
//!
//! A level names the board dimensions, the color palette refill draws from,
//! the registered bomb templates, the move budget and score goal, and any
//! starting tiles/pieces that override the defaults. Validation runs once at
//! board setup: configuration problems are fatal there and never have to be
//! handled mid-game.

use std::fmt;

use match_board_types::{
    BombKind, PieceColor, TileKind, DEFAULT_MOVES, DEFAULT_SCORE_GOAL,
};

use crate::grid::{Grid, Piece, Tile};

/// A tile placed by the level before the default Normal fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingTile {
    pub x: i8,
    pub y: i8,
    pub kind: TileKind,
    /// Hits before a Breakable tile turns Normal; ignored for other kinds
    pub break_value: u8,
}

/// A piece placed by the level before the random fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingPiece {
    pub x: i8,
    pub y: i8,
    pub color: PieceColor,
}

/// Fatal configuration errors caught at board setup
///
/// These abort initialization; nothing here is recoverable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// Zero-sized boards cannot be played
    InvalidDimensions { width: u8, height: u8 },
    /// Refill has no colors to draw from
    EmptyPalette,
    /// A bomb kind has no registered template
    MissingBombTemplate(BombKind),
    /// A starting tile falls outside the board
    TileOutOfBounds { x: i8, y: i8 },
    /// A Breakable starting tile with nothing left to break
    BreakableWithoutValue { x: i8, y: i8 },
    /// A starting piece falls outside the board
    PieceOutOfBounds { x: i8, y: i8 },
    /// A starting piece sits on an Obstacle tile
    PieceOnObstacle { x: i8, y: i8 },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::InvalidDimensions { width, height } => {
                write!(f, "board dimensions {}x{} are invalid", width, height)
            }
            SetupError::EmptyPalette => write!(f, "piece palette is empty"),
            SetupError::MissingBombTemplate(kind) => {
                write!(f, "no template registered for {} bombs", kind.as_str())
            }
            SetupError::TileOutOfBounds { x, y } => {
                write!(f, "starting tile at ({}, {}) is out of bounds", x, y)
            }
            SetupError::BreakableWithoutValue { x, y } => {
                write!(
                    f,
                    "breakable tile at ({}, {}) needs a break value of at least 1",
                    x, y
                )
            }
            SetupError::PieceOutOfBounds { x, y } => {
                write!(f, "starting piece at ({}, {}) is out of bounds", x, y)
            }
            SetupError::PieceOnObstacle { x, y } => {
                write!(
                    f,
                    "starting piece at ({}, {}) sits on an obstacle tile",
                    x, y
                )
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// A playable level description
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub width: u8,
    pub height: u8,
    /// Colors the refill step may draw
    pub palette: Vec<PieceColor>,
    /// Bomb kinds with a registered template; all four are required
    pub bomb_templates: Vec<BombKind>,
    pub moves: u32,
    pub score_goal: u32,
    pub starting_tiles: Vec<StartingTile>,
    pub starting_pieces: Vec<StartingPiece>,
}

impl Level {
    /// A plain level: full palette, all bomb templates, default budget,
    /// no special tiles
    pub fn standard(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            palette: PieceColor::ALL.to_vec(),
            bomb_templates: BombKind::ALL.to_vec(),
            moves: DEFAULT_MOVES,
            score_goal: DEFAULT_SCORE_GOAL,
            starting_tiles: Vec::new(),
            starting_pieces: Vec::new(),
        }
    }

    /// Check the whole configuration; any error is fatal to setup
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.width == 0 || self.height == 0 {
            return Err(SetupError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.palette.is_empty() {
            return Err(SetupError::EmptyPalette);
        }
        for kind in BombKind::ALL {
            if !self.bomb_templates.contains(&kind) {
                return Err(SetupError::MissingBombTemplate(kind));
            }
        }

        let in_bounds =
            |x: i8, y: i8| x >= 0 && (x as u8) < self.width && y >= 0 && (y as u8) < self.height;

        for tile in &self.starting_tiles {
            if !in_bounds(tile.x, tile.y) {
                return Err(SetupError::TileOutOfBounds {
                    x: tile.x,
                    y: tile.y,
                });
            }
            if tile.kind == TileKind::Breakable && tile.break_value == 0 {
                return Err(SetupError::BreakableWithoutValue {
                    x: tile.x,
                    y: tile.y,
                });
            }
        }

        for piece in &self.starting_pieces {
            if !in_bounds(piece.x, piece.y) {
                return Err(SetupError::PieceOutOfBounds {
                    x: piece.x,
                    y: piece.y,
                });
            }
            let on_obstacle = self.starting_tiles.iter().any(|t| {
                t.x == piece.x && t.y == piece.y && t.kind == TileKind::Obstacle
            });
            if on_obstacle {
                return Err(SetupError::PieceOnObstacle {
                    x: piece.x,
                    y: piece.y,
                });
            }
        }

        Ok(())
    }

    /// Build the starting grid: tiles first, then placed pieces
    ///
    /// Cells the level does not mention get Normal tiles and stay empty; the
    /// engine's fill step populates them afterwards.
    pub fn build_grid(&self) -> Result<Grid, SetupError> {
        self.validate()?;

        let mut grid = Grid::new(self.width, self.height);
        for tile in &self.starting_tiles {
            let built = match tile.kind {
                TileKind::Normal => Tile::normal(),
                TileKind::Obstacle => Tile::obstacle(),
                TileKind::Breakable => Tile::breakable(tile.break_value),
            };
            grid.set_tile(tile.x, tile.y, built);
        }
        for piece in &self.starting_pieces {
            grid.place_piece(Piece::normal(piece.color), piece.x, piece.y);
        }
        Ok(grid)
    }
}
