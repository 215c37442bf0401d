//! Random sources for normal-mode sampling.
//!
//! The engine draws uniform values in `[0, 1)` through the
//! [`RandomSource`] trait so that callers choose the strategy: one
//! shared seeded generator, one generator per thread, or a fixed script
//! of draws for tests.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A source of uniform draws in `[0, 1)`, safe to share across threads.
pub trait RandomSource: Send + Sync {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// A single generator shared behind a mutex.
///
/// # Examples
///
/// ```rust
/// use loreroll::random::{RandomSource, SeededRandom};
///
/// let a = SeededRandom::from_seed(7);
/// let b = SeededRandom::from_seed(7);
/// assert_eq!(a.next_unit(), b.next_unit());
/// ```
#[derive(Debug)]
pub struct SeededRandom<R = ChaCha8Rng> {
    rng: Mutex<R>,
}

impl SeededRandom<ChaCha8Rng> {
    /// A ChaCha8 generator seeded from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// A ChaCha8 generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng + Send> SeededRandom<R> {
    /// Wrap any generator.
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: Rng + Send> RandomSource for SeededRandom<R> {
    fn next_unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

/// Draws from `rand::thread_rng`, one generator per calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when it runs out.
///
/// Meant for tests that need to hit exact selection boundaries.
///
/// # Examples
///
/// ```rust
/// use loreroll::random::{RandomSource, ScriptedRandom};
///
/// let script = ScriptedRandom::new([0.25, 0.75]);
/// assert_eq!(script.next_unit(), 0.25);
/// assert_eq!(script.next_unit(), 0.75);
/// assert_eq!(script.next_unit(), 0.25);
/// ```
#[derive(Debug)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: AtomicUsize,
}

impl ScriptedRandom {
    /// An empty script always draws `0.0`.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// How many draws have been taken.
    pub fn taken(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.draws[idx % self.draws.len()]
    }
}
