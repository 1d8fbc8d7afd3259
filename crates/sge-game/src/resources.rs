//! World resources shared by the DNA scripts.

use bevy_ecs::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG driving every random choice the scripts make.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Whole-number offset in `(-range, range)`, as `f32`.
    pub fn offset(&mut self, range: i32) -> f32 {
        if range <= 1 {
            return 0.0;
        }
        self.0.gen_range(-(range - 1)..range) as f32
    }

    pub fn coin(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

/// Births across every unit in the scene.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Population {
    pub births: u32,
}
