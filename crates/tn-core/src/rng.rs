//! Deterministic run-level RNG wrapper.
//!
//! Every stochastic operator in the workspace — the route walk, selection
//! sampling, crossover parent assignment, mutation draws — takes
//! `&mut GaRng` explicitly.  There is no thread-local or global randomness
//! anywhere, so a run is fully reproduced by its seed.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The run's single logical random source.
///
/// Create one per optimization run and pass it `&mut` into every sampling
/// call.  The type is `!Sync` so it cannot be shared across threads by
/// accident; parallel extensions must derive per-worker children with
/// [`child`](Self::child).
pub struct GaRng(SmallRng);

impl GaRng {
    pub fn new(seed: u64) -> Self {
        GaRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `GaRng` with a different seed offset — useful for
    /// seeding per-worker RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> GaRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        GaRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// Sample `k` distinct indices from `0..n` without replacement.
    ///
    /// Partial Fisher-Yates over an index vector; the result order is
    /// deterministic for a given RNG state.  `k` is clamped to `n`.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let k = k.min(n);
        let mut idx: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = self.0.gen_range(i..n);
            idx.swap(i, j);
        }
        idx.truncate(k);
        idx
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}
