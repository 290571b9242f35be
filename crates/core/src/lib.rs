//! Core simulation module - pure, deterministic, and testable
//!
//! This crate is the board simulation engine of a tile-matching puzzle:
//! grid state, match detection, swap resolution, bomb pieces, and the
//! clear/collapse/refill cascade loop. It has **zero dependencies** on UI,
//! networking, or I/O, making it:
//!
//! - **Deterministic**: the same level and seed replay the same board
//! - **Testable**: every rule has unit coverage; no singletons anywhere
//! - **Portable**: runs headless, under a renderer, or behind the adapter
//!
//! # Module Structure
//!
//! - [`grid`]: parallel tile/piece arenas with bounds-checked sentinel access
//! - [`matcher`]: pure run scanning (straight runs and L/T corner unions)
//! - [`bomb`]: match-shape-to-bomb policy and bomb blast sets
//! - [`swap`]: swap validation, provisional exchange, outcome or revert
//! - [`cascade`]: the Idle/Resolving/Collapsing/Refilling/Rechecking machine
//! - [`level`]: layout description, validation, board construction
//! - [`rng`]: deterministic LCG and uniform palette sampling
//! - [`scoring`]: per-piece score arithmetic
//! - [`snapshot`]: flat numeric views for observers and the adapter
//! - [`events`]: the outgoing event queue and the motion probe hook
//!
//! # Game Rules
//!
//! - Runs of 3+ same-colored pieces clear; L/T unions count via a relaxed
//!   per-arm minimum of 2 around the shared pivot
//! - A 4-match spawns a Row or Column bomb (by swap direction), a 5-match a
//!   Color bomb, a 5-match with both arms a Neighbour bomb
//! - Cleared columns collapse (stable compaction), empty cells refill from
//!   the palette, and new matches chain with an escalating score multiplier
//! - Swaps are only accepted while the board is Idle
//!
//! # Example
//!
//! ```
//! use match_board_core::{GameState, Level};
//! use match_board_types::Coord;
//!
//! let level = Level::standard(8, 8);
//! let mut game = GameState::new(&level, 12345).unwrap();
//!
//! // Probe swaps until one is accepted, then run the cascade out.
//! 'outer: for y in 0..8 {
//!     for x in 0..7 {
//!         if game.request_swap(Coord::new(x, y), Coord::new(x + 1, y)).is_ok() {
//!             break 'outer;
//!         }
//!     }
//! }
//! game.run_until_stable();
//! assert!(!game.is_cascading());
//! ```

pub mod bomb;
pub mod cascade;
pub mod events;
pub mod grid;
pub mod level;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod swap;

pub use match_board_types as types;

// Re-export commonly used types for convenience
pub use bomb::{blast_cells, bomb_for_match, spawned_piece};
pub use cascade::{collapse_column, fill_board, GameState, Phase};
pub use events::{BoardEvent, InstantMotion, MotionProbe};
pub use grid::{Grid, Piece, Tile};
pub use level::{Level, SetupError, StartingPiece, StartingTile};
pub use matcher::{all_matches, matches_at, matches_for_cells, scan_direction};
pub use rng::{PaletteSampler, SimpleRng};
pub use scoring::{bonus_for_set, piece_score};
pub use snapshot::BoardSnapshot;
pub use swap::{resolve_swap, SwapOutcome, SwapRejection};
