#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded layout system that scatters circles across the play area.
//!
//! Positions are drawn uniformly and independently; overlapping circles are
//! allowed. Coordinates are whole pixels so layouts compare exactly.

use circle_dash_core::{Command, PlayArea, PointCount, Position};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the layout system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that produces circle positions for new games.
#[derive(Clone, Debug)]
pub struct Layout {
    rng: ChaCha8Rng,
}

impl Layout {
    /// Creates a new layout system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Draws one position per requested circle inside the play area.
    pub fn scatter(&mut self, count: PointCount, area: PlayArea) -> Vec<Position> {
        let (max_x, max_y) = area.placement_bounds();
        (0..count.get())
            .map(|_| {
                let x = self.sample_axis(max_x);
                let y = self.sample_axis(max_y);
                Position::new(x, y)
            })
            .collect()
    }

    /// Builds the command that starts a game with a freshly scattered layout.
    pub fn start_command(&mut self, count: PointCount, area: PlayArea) -> Command {
        Command::StartGame {
            positions: self.scatter(count, area),
        }
    }

    fn sample_axis(&mut self, bound: f32) -> f32 {
        if bound < 1.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..bound).floor()
    }
}
