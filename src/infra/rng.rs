use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::Randomizer;

/// Системный RNG (thread-local из `rand`).
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl Randomizer for SystemRng {
    fn next(&mut self, max_inclusive: usize) -> usize {
        rand::thread_rng().gen_range(0..=max_inclusive)
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Одинаковый seed — одинаковые раздачи.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomizer for DeterministicRng {
    fn next(&mut self, max_inclusive: usize) -> usize {
        self.inner.gen_range(0..=max_inclusive)
    }
}
