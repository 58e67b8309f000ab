//! Random point generation over the workspace and local neighborhoods

use crate::geometry::Point;
use nalgebra::vector;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform sampler over a bounded rectangular workspace
pub struct Sampler {
    x_dist: Uniform<f32>,
    y_dist: Uniform<f32>,
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler over `[0, width) x [0, height)`
    ///
    /// A fixed seed makes every draw deterministic; `None` seeds from
    /// the system entropy source.
    pub fn new(width: f32, height: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            x_dist: Uniform::new(0.0, width),
            y_dist: Uniform::new(0.0, height),
            rng,
        }
    }

    /// Draw a point with each coordinate uniform over the workspace
    pub fn sample_workspace(&mut self) -> Point {
        Point::new(
            self.x_dist.sample(&mut self.rng),
            self.y_dist.sample(&mut self.rng),
        )
    }

    /// Perturb `base` by independent offsets uniform in `[-radius, +radius]`
    pub fn jitter(&mut self, base: &Point, radius: f32) -> Point {
        let offset = Uniform::new_inclusive(-radius, radius);
        base + vector![
            offset.sample(&mut self.rng),
            offset.sample(&mut self.rng)
        ]
    }

    /// Pick a uniform index in `0..len`
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
