// Seeded random source.
//
// Every random value the starfield uses comes from here. The stream is a
// pure function of the seed string and the number of draws since
// construction or the last `Random::reset`; no clock or OS entropy leaks in.

use std::cell::RefCell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Used when the caller hands us an empty seed.
pub const DEFAULT_SEED: &str = "starfield";

/// Host-owned handle shared by the composer and its effects.
/// Single-threaded: only one frame draws from it at a time.
pub type SharedRandom = Rc<RefCell<Random>>;

#[derive(Clone)]
pub struct Random {
    seed: String,
    key: [u8; 32],
    rng: ChaCha20Rng,
}

impl Random {
    pub fn new(seed: &str) -> Self {
        let seed = if seed.is_empty() { DEFAULT_SEED } else { seed };
        let key = *blake3::hash(seed.as_bytes()).as_bytes();
        Self {
            seed: seed.to_owned(),
            key,
            rng: ChaCha20Rng::from_seed(key),
        }
    }

    pub fn shared(seed: &str) -> SharedRandom {
        Rc::new(RefCell::new(Self::new(seed)))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Uniform in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform integer in `[min, max]`, one draw. Any pair of bounds is
    /// valid, including the full `i64` range.
    pub fn rand_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = (i128::from(min.min(max)), i128::from(min.max(max)));
        let span = (hi - lo + 1) as f64;
        // f64 rounding can land exactly on `span` for very wide ranges
        let offset = (self.random() * span).floor() as i128;
        (lo + offset).min(hi) as i64
    }

    /// Rewind to the state right after construction.
    pub fn reset(&mut self) {
        self.rng = ChaCha20Rng::from_seed(self.key);
    }

    /// An independent stream keyed by this seed and `label`.
    /// Drawing from it never advances `self`.
    pub fn derive(&self, label: &str) -> Random {
        Random::new(&format!("{}/{}", self.seed, label))
    }
}

impl std::fmt::Debug for Random {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Random").field("seed", &self.seed).finish_non_exhaustive()
    }
}
