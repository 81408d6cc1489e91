use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// Randomness used for target placement, stimulus delays and sequence cells
pub trait RandomSource: std::fmt::Debug {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform draw in `0..n`. `n` must be non-zero.
    fn index(&mut self, n: usize) -> usize;

    /// Uniform draw in `[low, high)`.
    fn between(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }
}

#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// Replays fixed draws, cycling once exhausted.
///
/// With no scripted values `unit()` yields 0.5 and `index()` yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(u) => {
                self.units.push_back(u);
                u
            }
            None => 0.5,
        }
    }

    fn index(&mut self, n: usize) -> usize {
        match self.indices.pop_front() {
            Some(i) => {
                self.indices.push_back(i);
                i % n
            }
            None => 0,
        }
    }
}
