//! [`RandomSource`] over the `rand` ecosystem, for hosts that want OS-seeded rolls.

use bestiary_core::RandomSource;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

#[derive(Clone, Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}
