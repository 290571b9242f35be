//! Board events and presentation hooks
//!
//! The engine has no ambient collaborators: anything the outside world needs
//! to know about leaves as a [`BoardEvent`] in a queue the host drains, and
//! the single thing the engine needs back from the presentation layer - "has
//! this piece finished animating into its cell?" - comes in through the
//! injected [`MotionProbe`].

use match_board_types::{BombKind, Coord};

/// Something that happened inside the simulation worth telling a collaborator
///
/// Events accumulate in order and are consumed with
/// [`GameState::take_events`](crate::cascade::GameState::take_events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A piece was destroyed; the score collaborator adds
    /// `value * multiplier + bonus`.
    Score {
        x: i8,
        y: i8,
        value: u32,
        multiplier: u32,
        bonus: u32,
    },
    /// A Breakable tile took a hit (break-effect playback hook)
    TileBreak { x: i8, y: i8, remaining: u8 },
    /// A new bomb entered the board at the swap's origin cell
    BombSpawned { x: i8, y: i8, kind: BombKind },
    /// A bomb on the board went off (swapped directly, or chained)
    BombDetonated { x: i8, y: i8, kind: BombKind },
    /// A chained cascade started; `level` is the new score multiplier
    CascadeLevel { level: u32 },
    /// Refill gave up redrawing a self-matching cell and kept it
    RefillExhausted { x: i8, y: i8 },
    /// The cascade finished; the board is stable and accepts swaps again
    BoardStable,
}

/// Presentation-side report of whether a piece has reached its cell
///
/// The engine asks this at the end of the Collapsing phase before it
/// considers the grid settled. Hosts without animation use
/// [`InstantMotion`].
pub trait MotionProbe {
    /// True once the piece logically at `cell` is visually there too
    fn has_settled(&self, cell: Coord) -> bool;

    /// True once every listed piece has settled
    fn all_settled(&self, cells: &[Coord]) -> bool {
        cells.iter().all(|&c| self.has_settled(c))
    }
}

/// The no-animation probe: everything is always where it belongs
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantMotion;

impl MotionProbe for InstantMotion {
    fn has_settled(&self, _cell: Coord) -> bool {
        true
    }
}
