//! Delta sources for the bounded random walk.
//!
//! A source yields unit samples in `[-1.0, 1.0]`, which the store scales by
//! each metric's step bound, and whole steps for count-like metrics.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Produces unit samples in `[-1.0, 1.0]`.
pub trait DeltaSource: Send {
    fn unit(&mut self) -> f64;

    /// Whole step in `[-bound, bound]`.
    ///
    /// Random sources draw every integer with equal probability. The default
    /// rounds a scaled unit sample, which suits scripted sources.
    fn whole(&mut self, bound: u32) -> i64 {
        (self.unit() * f64::from(bound)).round() as i64
    }
}

impl<D: DeltaSource + ?Sized> DeltaSource for Box<D> {
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn whole(&mut self, bound: u32) -> i64 {
        (**self).whole(bound)
    }
}

/// Uniform samples from a seeded ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct RandomDeltas {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomDeltas {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fresh seed from the thread RNG. Read it back with [`RandomDeltas::seed`]
    /// to replay a run.
    pub fn from_random_seed() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DeltaSource for RandomDeltas {
    fn unit(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }

    fn whole(&mut self, bound: u32) -> i64 {
        let bound = i64::from(bound);
        self.rng.gen_range(-bound..=bound)
    }
}

/// Scripted samples, cycled in order. Values are clamped into `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct FixedDeltas {
    samples: Vec<f64>,
    pos: usize,
}

impl FixedDeltas {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        let samples: Vec<f64> = samples
            .into_iter()
            .map(|s| if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) })
            .collect();
        Self { samples, pos: 0 }
    }

    /// Always the same sample (`1.0` pushes every metric up by its full step).
    pub fn constant(sample: f64) -> Self {
        Self::new([sample])
    }
}

impl DeltaSource for FixedDeltas {
    fn unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let s = self.samples[self.pos % self.samples.len()];
        self.pos = self.pos.wrapping_add(1);
        s
    }
}
