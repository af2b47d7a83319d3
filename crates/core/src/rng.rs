//! RNG module - deterministic randomness for spawning
//!
//! Spawns draw a uniform piece kind and, optionally, a random initial
//! orientation. Everything goes through one seeded LCG so a match is fully
//! reproducible from its seed.

use crate::piece::Orientation;
use crate::types::{Axis, PieceKind};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
    seed: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would stay zero
        let seed = if seed == 0 { 1 } else { seed };
        Self { state: seed, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Value in `[0, max)`; uses the high bits, which have the longest period
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Fair coin
    pub fn chance_half(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }

    pub fn pick_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    /// Random axis with 0 to 3 quarter turns about it
    pub fn spawn_orientation(&mut self) -> Orientation {
        let axis = Axis::ALL[self.next_range(3) as usize];
        let turns = self.next_range(4) as i32;
        Orientation::turns(axis, turns)
    }
}
