//! Seedable random sources and deterministic seed derivation.
//! This module exists so every random draw in a trial comes from an explicit stream.
//! It does not decide how many streams a run uses; the experiment runner does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Minimal random interface used by layouts, strategies and the sucker-punch roll.
///
/// Tests implement it with scripted values; runs use [`ChaCha8Rng`].
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as usize
    }

    /// Uniform float in `[0, 1)` built from the top 53 bits.
    fn unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }
}

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: RandomSource + ?Sized>(values: &mut [T], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.below(i + 1);
        values.swap(i, j);
    }
}

/// Draws `count` distinct indices from `0..len` in draw order (partial Fisher-Yates).
pub fn sample_distinct<R: RandomSource + ?Sized>(len: usize, count: usize, rng: &mut R) -> Vec<usize> {
    debug_assert!(count <= len);
    let mut pool: Vec<usize> = (0..len).collect();
    for i in 0..count {
        let j = i + rng.below(len - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

pub fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

/// Stream for one block of trials of one strategy slot.
pub fn block_rng(seed: u64, strategy_slot: u64, block: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix_seed_stream(mix_seed_stream(seed, strategy_slot), block))
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Seed for runs that were not given one explicitly. Varies per call.
pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed_stream(entropy, counter)
}

/// Replays a fixed list of raw values, cycling when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    values: Vec<u64>,
    cursor: usize,
    pub(crate) draws: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(values: &[u64]) -> Self {
        Self { values: values.to_vec(), cursor: 0, draws: 0 }
    }

    /// A source whose `unit_f64` always returns approximately `value`.
    pub(crate) fn unit(value: f64) -> Self {
        let raw = ((value * (1_u64 << 53) as f64) as u64) << 11;
        Self::new(&[raw])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        self.draws += 1;
        value
    }
}
