//! Cascade engine - the clear/collapse/refill state machine
//!
//! One accepted swap drives the board through repeated
//! Resolving -> Collapsing -> Refilling -> Rechecking cycles until no new
//! match appears, then back to Idle. Exactly one phase runs per [`GameState::step`]
//! call; the host decides pacing (a visual host inserts delays, a headless
//! host calls [`GameState::run_until_stable`]).
//!
//! While any phase other than Idle is active, new swaps are rejected - the
//! single writer to the grid is whichever phase is running, so no locking is
//! needed anywhere.

use arrayvec::ArrayVec;
use match_board_types::{
    Coord, PieceColor, MAX_FILL_RETRIES, PIECE_BASE_VALUE, SWAP_DURATION_MS,
};

use crate::bomb::blast_cells;
use crate::events::{BoardEvent, InstantMotion, MotionProbe};
use crate::grid::{Grid, Piece};
use crate::level::{Level, SetupError};
use crate::matcher::{has_match_on_fill, matches_for_cells};
use crate::rng::PaletteSampler;
use crate::scoring::{bonus_for_set, piece_score};
use crate::swap::{resolve_swap, SwapOutcome, SwapRejection};

/// Cascade phases
///
/// Idle is the only phase that accepts swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
    Collapsing,
    Refilling,
    Rechecking,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Resolving => "resolving",
            Phase::Collapsing => "collapsing",
            Phase::Refilling => "refilling",
            Phase::Rechecking => "rechecking",
        }
    }
}

/// Drop every piece in `column` into the lowest empty fillable slot below it
///
/// Bottom-up, one landing site at a time, preserving relative order (stable
/// compaction). Obstacle cells are never landing sites, but pieces above one
/// fall straight past it. Returns the landing cells of the pieces that moved.
pub fn collapse_column(grid: &mut Grid, column: i8) -> Vec<Coord> {
    let mut moved = Vec::new();
    let height = grid.height() as i8;

    for y in 0..height - 1 {
        if grid.piece(column, y).is_some() || !grid.is_fillable(column, y) {
            continue;
        }
        for above in (y + 1)..height {
            if let Some(piece) = grid.clear_cell(column, above) {
                grid.place_piece(piece, column, y);
                moved.push(Coord::new(column, y));
                break;
            }
        }
    }

    moved
}

/// Fill every empty fillable cell with a random palette piece
///
/// A cell whose fresh piece immediately sits in a match (left or downward
/// run) is cleared and redrawn, up to [`MAX_FILL_RETRIES`] times; past that
/// the self-matching piece is kept and a diagnostic event is emitted.
/// Returns the cells that were filled.
pub fn fill_board(
    grid: &mut Grid,
    sampler: &mut PaletteSampler,
    events: &mut Vec<BoardEvent>,
) -> Vec<Coord> {
    let mut filled = Vec::new();

    for x in 0..grid.width() as i8 {
        for y in 0..grid.height() as i8 {
            if grid.piece(x, y).is_some() || !grid.is_fillable(x, y) {
                continue;
            }

            grid.place_piece(Piece::normal(sampler.draw()), x, y);

            let mut retries = 0;
            while has_match_on_fill(grid, x, y) {
                if retries >= MAX_FILL_RETRIES {
                    events.push(BoardEvent::RefillExhausted { x, y });
                    break;
                }
                grid.clear_cell(x, y);
                grid.place_piece(Piece::normal(sampler.draw()), x, y);
                retries += 1;
            }

            filled.push(Coord::new(x, y));
        }
    }

    filled
}

/// The complete board simulation state
///
/// Owns the grid, the refill sampler, the cascade phase machine, the move
/// budget, the running score, and the outgoing event queue. Collaborators
/// are injected (the motion probe) or pull-based (the event queue); the
/// engine holds no ambient globals.
pub struct GameState {
    grid: Grid,
    sampler: PaletteSampler,
    probe: Box<dyn MotionProbe + Send>,
    phase: Phase,
    cascade_level: u32,
    score: u32,
    score_goal: u32,
    moves_left: u32,
    /// Cells queued for destruction when Resolving runs next
    pending_clear: Vec<Coord>,
    /// Bombs created by the swap, registered onto the board after the clear
    queued_bombs: ArrayVec<(Coord, Piece), 2>,
    /// Columns the last clear touched; Collapsing compacts exactly these
    touched_columns: Vec<i8>,
    /// Landing and refill cells of the current cycle; Rechecking seeds here
    changed_cells: Vec<Coord>,
    collapse_applied: bool,
    events: Vec<BoardEvent>,
}

impl GameState {
    /// Build a board from a level: validate, lay out tiles and starting
    /// pieces, then random-fill the rest
    ///
    /// Configuration errors abort setup; nothing is recoverable here.
    pub fn new(level: &Level, seed: u32) -> Result<Self, SetupError> {
        let grid = level.build_grid()?;
        let mut state = Self {
            grid,
            sampler: PaletteSampler::new(&level.palette, seed),
            probe: Box::new(InstantMotion),
            phase: Phase::Idle,
            cascade_level: 0,
            score: 0,
            score_goal: level.score_goal,
            moves_left: level.moves,
            pending_clear: Vec::new(),
            queued_bombs: ArrayVec::new(),
            touched_columns: Vec::new(),
            changed_cells: Vec::new(),
            collapse_applied: false,
            events: Vec::new(),
        };
        fill_board(&mut state.grid, &mut state.sampler, &mut state.events);
        Ok(state)
    }

    /// Wrap an existing grid, for tests and tools that need exact boards
    ///
    /// Uses the full palette and default budgets; the grid is taken as-is
    /// with no initial fill.
    pub fn from_grid(grid: Grid, seed: u32) -> Self {
        Self {
            grid,
            sampler: PaletteSampler::new(&PieceColor::ALL, seed),
            probe: Box::new(InstantMotion),
            phase: Phase::Idle,
            cascade_level: 0,
            score: 0,
            score_goal: match_board_types::DEFAULT_SCORE_GOAL,
            moves_left: match_board_types::DEFAULT_MOVES,
            pending_clear: Vec::new(),
            queued_bombs: ArrayVec::new(),
            touched_columns: Vec::new(),
            changed_cells: Vec::new(),
            collapse_applied: false,
            events: Vec::new(),
        }
    }

    /// Replace the motion probe (presentation hosts report settledness here)
    pub fn with_motion_probe(mut self, probe: Box<dyn MotionProbe + Send>) -> Self {
        self.probe = probe;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a cascade is running; swaps are rejected meanwhile
    pub fn is_cascading(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn cascade_level(&self) -> u32 {
        self.cascade_level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn score_goal(&self) -> u32 {
        self.score_goal
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// Pacing hint for hosts animating the swap itself
    pub fn swap_duration_ms(&self) -> u32 {
        SWAP_DURATION_MS
    }

    /// Current sampler state (replaying it reproduces the refills)
    pub fn seed(&self) -> u32 {
        self.sampler.seed()
    }

    /// Drain the queued events, oldest first
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Entry point for the input collaborator
    ///
    /// Accepted swaps consume a move and start the cascade at level 1.
    /// Rejection leaves the grid untouched and costs nothing.
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<(), SwapRejection> {
        if self.phase != Phase::Idle {
            return Err(SwapRejection::Cascading);
        }
        if self.moves_left == 0 {
            return Err(SwapRejection::MovesExhausted);
        }

        match resolve_swap(&mut self.grid, a, b) {
            SwapOutcome::Rejected(reason) => Err(reason),
            SwapOutcome::Accepted { clear_set, spawned } => {
                self.moves_left -= 1;
                self.cascade_level = 1;
                self.pending_clear = clear_set;
                self.queued_bombs = spawned;
                self.phase = Phase::Resolving;
                Ok(())
            }
        }
    }

    /// Advance the cascade by one phase
    ///
    /// Returns true while more work remains. Collapsing repeats until the
    /// motion probe reports every moved piece settled.
    pub fn step(&mut self) -> bool {
        match self.phase {
            Phase::Idle => {}
            Phase::Resolving => self.resolve(),
            Phase::Collapsing => self.collapse(),
            Phase::Refilling => self.refill(),
            Phase::Rechecking => self.recheck(),
        }
        self.is_cascading()
    }

    /// Drive the cascade to completion
    ///
    /// Intended for headless hosts; requires a probe that eventually settles
    /// (the default [`InstantMotion`] always does).
    pub fn run_until_stable(&mut self) {
        while self.step() {}
    }

    /// Grow the pending clear set to its chained-detonation fixed point
    ///
    /// Any bomb inside the set folds its blast in; a blast can reach further
    /// bombs, so the worklist runs until nothing new appears.
    fn expand_clear_set(&mut self) -> Vec<Coord> {
        let mut expanded: Vec<Coord> = Vec::new();
        let mut worklist = std::mem::take(&mut self.pending_clear);

        while let Some(cell) = worklist.pop() {
            if expanded.contains(&cell) {
                continue;
            }
            let Some(piece) = self.grid.piece(cell.x, cell.y) else {
                continue;
            };
            expanded.push(cell);

            if let Some(kind) = piece.bomb {
                self.events.push(BoardEvent::BombDetonated {
                    x: cell.x,
                    y: cell.y,
                    kind,
                });
                for blast in blast_cells(&self.grid, cell.x, cell.y, piece) {
                    if !expanded.contains(&blast) {
                        worklist.push(blast);
                    }
                }
            }
        }

        expanded
    }

    /// Resolving: destroy the clear set, decay tiles, score, register bombs
    fn resolve(&mut self) {
        let clear_set = self.expand_clear_set();
        let bonus = bonus_for_set(clear_set.len());

        let mut columns: Vec<i8> = Vec::new();
        for cell in &clear_set {
            if self.grid.clear_cell(cell.x, cell.y).is_none() {
                continue;
            }

            self.score += piece_score(self.cascade_level, bonus);
            self.events.push(BoardEvent::Score {
                x: cell.x,
                y: cell.y,
                value: PIECE_BASE_VALUE,
                multiplier: self.cascade_level,
                bonus,
            });

            if let Some(remaining) = self.grid.break_tile_at(cell.x, cell.y) {
                self.events.push(BoardEvent::TileBreak {
                    x: cell.x,
                    y: cell.y,
                    remaining,
                });
            }

            if !columns.contains(&cell.x) {
                columns.push(cell.x);
            }
        }

        // The swap's new bombs go live now, each taking over its freshly
        // cleared origin cell instead of vanishing with the match.
        for (cell, bomb) in self.queued_bombs.take() {
            if self.grid.place_piece(bomb, cell.x, cell.y) {
                if let Some(kind) = bomb.bomb {
                    self.events.push(BoardEvent::BombSpawned {
                        x: cell.x,
                        y: cell.y,
                        kind,
                    });
                }
            }
        }

        columns.sort_unstable();
        self.touched_columns = columns;
        self.changed_cells.clear();
        self.collapse_applied = false;
        self.phase = Phase::Collapsing;
    }

    /// Collapsing: compact the touched columns, then wait for settledness
    fn collapse(&mut self) {
        if !self.collapse_applied {
            let columns = std::mem::take(&mut self.touched_columns);
            for column in columns {
                for landing in collapse_column(&mut self.grid, column) {
                    if !self.changed_cells.contains(&landing) {
                        self.changed_cells.push(landing);
                    }
                }
            }
            self.collapse_applied = true;
        }

        // The grid is settled only once the presentation layer agrees the
        // moved pieces have arrived.
        if self.probe.all_settled(&self.changed_cells) {
            self.phase = Phase::Refilling;
        }
    }

    /// Refilling: random pieces for every empty fillable cell
    fn refill(&mut self) {
        let filled = fill_board(&mut self.grid, &mut self.sampler, &mut self.events);
        for cell in filled {
            if !self.changed_cells.contains(&cell) {
                self.changed_cells.push(cell);
            }
        }
        self.phase = Phase::Rechecking;
    }

    /// Rechecking: do the changed cells seed new matches?
    ///
    /// Every match a cycle can create involves a cell that moved or was
    /// refilled in that cycle, so seeding from `changed_cells` is equivalent
    /// to a whole-board scan here.
    fn recheck(&mut self) {
        let matches = matches_for_cells(&self.grid, &self.changed_cells);

        if matches.is_empty() {
            self.cascade_level = 0;
            self.phase = Phase::Idle;
            self.events.push(BoardEvent::BoardStable);
        } else {
            self.cascade_level += 1;
            self.events.push(BoardEvent::CascadeLevel {
                level: self.cascade_level,
            });
            self.pending_clear = matches;
            self.phase = Phase::Resolving;
        }
    }
}
