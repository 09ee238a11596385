//! Seeded random source for the simulation

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic RNG wrapper
///
/// Every random decision in the simulation goes through this so a run can
/// be replayed from its seed and input log.
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[lo, hi)`
    ///
    /// A degenerate or inverted range returns a value between the bounds
    /// instead of panicking.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let t: f32 = self.inner.random();
        lo + t * (hi - lo)
    }
}
