//! Match-board (workspace facade crate).
//!
//! This package keeps the public `match_board::{core,adapter,types}` API in
//! one place while the implementation lives in dedicated crates under
//! `crates/`.

pub use match_board_adapter as adapter;
pub use match_board_core as core;
pub use match_board_types as types;
