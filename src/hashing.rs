//! SHA-256 round hashing for the swap-or-not shuffle.
//!
//! Every round derives its randomness from digests over a single input
//! layout, `seed ‖ round ‖ block`:
//!
//! - the pivot digest covers `seed ‖ round` and yields a 64-bit
//!   little-endian pivot,
//! - the source digest covers the full layout and yields one decision
//!   bit per position inside a 256-position block.
//!
//! [`RoundHasher`] keeps that layout in one reusable buffer so a pass
//! over many positions only rewrites the round byte and the block
//! number between digests.

use sha2::{Digest, Sha256};

/// One-shot SHA-256 digest.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Reusable hash-input buffer for one shuffle pass.
///
/// The seed is written once at construction. Advancing rounds and
/// blocks only pokes the trailing five bytes, so the seed bytes are
/// never copied again.
#[derive(Debug)]
pub(crate) struct RoundHasher {
    /// `seed ‖ round ‖ block`, with `round` at `seed.len()`.
    buf: Vec<u8>,
    round_at: usize,
}

impl RoundHasher {
    pub(crate) fn new(seed: &[u8]) -> Self {
        let round_at = seed.len();
        let mut buf = vec![0u8; round_at + 1 + 4];
        buf[..round_at].copy_from_slice(seed);
        Self { buf, round_at }
    }

    /// Sets the round byte for all subsequent digests.
    pub(crate) fn set_round(&mut self, round: u8) {
        self.buf[self.round_at] = round;
    }

    /// Derives the round pivot in `[0, list_size)`.
    ///
    /// Digests `seed ‖ round` only; the block bytes are not part of the
    /// pivot input.
    pub(crate) fn pivot(&self, list_size: u64) -> u64 {
        let digest = sha256(&self.buf[..=self.round_at]);
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(raw) % list_size
    }

    /// Source digest for the 256-position block containing `position`.
    pub(crate) fn source(&mut self, position: u64) -> [u8; 32] {
        let block = (position >> 8) as u32;
        self.buf[self.round_at + 1..].copy_from_slice(&block.to_le_bytes());
        sha256(&self.buf)
    }
}
