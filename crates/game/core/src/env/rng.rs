//! Random source for behavior rolls, drop rolls, and spawn placement.
//!
//! Simulation code never reaches for a global RNG. Every roll goes through a
//! [`RandomSource`] handed in by the host, so a seeded [`PcgRng`] replays the
//! same jumps, drops, and placements in tests.

/// Random number source consumed by strategies and the spawn injector.
pub trait RandomSource {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        // 24 high-quality bits map exactly onto the f32 mantissa
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Bernoulli trial with probability `p`.
    ///
    /// `p >= 1` always succeeds and `p <= 0` (or NaN) never does, without
    /// consuming randomness in either case.
    fn chance(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            return true;
        }
        if !(p > 0.0) {
            return false;
        }
        self.next_f32() < p
    }

    /// Uniform integer in `[min, max]` inclusive.
    fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max as i64 - min as i64 + 1) as u64;
        min + (self.next_u32() as u64 % span) as i32
    }

    /// Uniform float in `[min, max)`.
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + (max - min) * self.next_f32()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant producing 32-bit output from 64-bit state.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same sequence
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.state = Self::pcg_step(rng.state.wrapping_add(seed));
        rng
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::new(0x853c_49e6_748f_ea9b)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

/// Source that always yields the same value. Handy for forcing rolls in tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(pub u32);

impl RandomSource for FixedRandom {
    fn next_u32(&mut self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_sequence() {
        let mut a = PcgRng::new(42);
        let mut b = PcgRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn chance_extremes_are_certain() {
        let mut rng = PcgRng::new(7);
        assert!((0..100).all(|_| rng.chance(1.0)));
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!(!rng.chance(f32::NAN));
    }

    #[test]
    fn ranges_stay_inclusive() {
        let mut rng = PcgRng::new(9);
        for _ in 0..500 {
            let v = rng.range_i32(1, 3);
            assert!((1..=3).contains(&v));
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f));
        }
        assert_eq!(rng.range_i32(5, 5), 5);
    }
}
