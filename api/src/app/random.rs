//! Shared random source
//!
//! `StdRng` is a ChaCha-based CSPRNG. In production it is seeded from OS
//! entropy; tests and demos can pin a seed to make draws reproducible.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source injected into code generation and the draw algorithm
pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Run `f` with exclusive access to the generator.
    ///
    /// The lock is released when `f` returns, so callers cannot hold it
    /// across an `.await`.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }
}
