//! Entropy source for randomness-producing devices.
//!
//! Devices draw random bytes through the `EntropySource` trait. The default
//! source is SplitMix64: fast, never blocking, never failing, and reproducible
//! when seeded. It is not cryptographically secure, which the RNG model does not need.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// A provider of random bytes.
pub trait EntropySource: Send {
    /// Fills `buf` completely with random bytes.
    fn fill(&mut self, buf: &mut [u8]);
}

/// Entropy source shared by every device of a SoC.
pub type SharedEntropy = Arc<Mutex<dyn EntropySource>>;

/// Wraps `source` for sharing between devices.
pub fn shared(source: impl EntropySource + 'static) -> SharedEntropy {
    Arc::new(Mutex::new(source))
}

/// Draws `buf.len()` bytes from a shared source.
///
/// A poisoned lock is recovered: the generator state is still a valid generator state.
pub fn fill_shared(source: &SharedEntropy, buf: &mut [u8]) {
    source
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .fill(buf);
}

/// SplitMix64 pseudo-random generator.
///
/// Any seed is valid, including 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a generator seeded with `seed`.
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Creates a generator seeded from the host clock.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0x853C_49E6_748F_EA9B, |d| d.as_nanos() as u64);
        Self::new(seed)
    }

    /// Creates a generator from an optional seed, falling back to the host clock.
    pub fn seeded(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_clock, Self::new)
    }

    /// Advances the generator and returns the next 64-bit value.
    pub const fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl EntropySource for SplitMix64 {
    fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
