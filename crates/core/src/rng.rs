//! RNG module - deterministic random piece colors
//!
//! Refill draws uniformly from the level's palette. The generator is a small
//! LCG rather than an external crate: the same seed must replay the same
//! board, both for tests and for driving the engine from a recorded session.

use arrayvec::ArrayVec;
use match_board_types::PieceColor;

/// Maximum palette size a sampler can hold
pub const PALETTE_MAX: usize = 8;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Current internal state (for replaying a sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform color draws from a fixed palette
#[derive(Debug, Clone)]
pub struct PaletteSampler {
    palette: ArrayVec<PieceColor, PALETTE_MAX>,
    rng: SimpleRng,
}

impl PaletteSampler {
    /// Create a sampler over `palette` with the given seed
    ///
    /// The palette must be non-empty; the level validator enforces that
    /// before a sampler is ever built.
    pub fn new(palette: &[PieceColor], seed: u32) -> Self {
        let mut held = ArrayVec::new();
        for &color in palette.iter().take(PALETTE_MAX) {
            held.push(color);
        }
        Self {
            palette: held,
            rng: SimpleRng::new(seed),
        }
    }

    /// Draw one uniformly random palette color
    pub fn draw(&mut self) -> PieceColor {
        let idx = self.rng.next_range(self.palette.len() as u32) as usize;
        self.palette[idx]
    }

    /// The palette this sampler draws from
    pub fn palette(&self) -> &[PieceColor] {
        &self.palette
    }

    /// Current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}
