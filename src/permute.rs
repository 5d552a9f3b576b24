//! Single-index swap-or-not permutation.
//!
//! Computes where one index lands under a seeded permutation of
//! `0..list_size` without materializing the list. Each round derives a
//! pivot from the seed, reflects the index across it, and consults one
//! hash bit to decide whether the index swaps with its reflection:
//!
//! ```text
//! pivot    = LE64(sha256(seed ‖ round)[0..8]) mod list_size
//! flip     = (pivot - index) mod list_size
//! position = max(index, flip)
//! bit      = bit (position mod 256) of sha256(seed ‖ round ‖ LE32(position div 256))
//! index    = flip           when the bit is set
//! ```
//!
//! Every round is an involution, so running the rounds in reverse order
//! inverts the permutation. [`permuted_index`] and [`unpermuted_index`]
//! differ only in round order.

use crate::error::{ShuffleError, ShuffleResult};
use crate::hashing::RoundHasher;

/// Number of swap-or-not rounds in every permutation pass.
pub const SHUFFLE_ROUND_COUNT: u8 = 90;

/// Largest supported list size, `2^40`.
///
/// The round hash addresses decision bits through a 4-byte block
/// number, each block covering 256 positions. Larger lists would alias
/// block numbers and reuse decision bits.
pub const MAX_LIST_SIZE: u64 = 1 << 40;

/// Computes the destination of `index` under the permutation of
/// `0..list_size` selected by `seed`.
///
/// The result relates to the list operations as: shuffling a list moves
/// the element at `index` to `permuted_index(index, ..)`.
///
/// # Errors
///
/// Returns [`ShuffleError::ListTooLarge`] if `list_size` exceeds
/// [`MAX_LIST_SIZE`], and [`ShuffleError::IndexOutOfRange`] if `index`
/// does not address an element (which is every index when `list_size`
/// is zero). Inputs are validated before any round runs.
///
/// # Example
///
/// ```
/// use swapnot::{permuted_index, unpermuted_index};
///
/// let seed = b"example seed";
/// let forward = permuted_index(3, 10, seed)?;
/// assert_eq!(unpermuted_index(forward, 10, seed)?, 3);
/// # Ok::<(), swapnot::ShuffleError>(())
/// ```
pub fn permuted_index(index: u64, list_size: u64, seed: &[u8]) -> ShuffleResult<u64> {
    check_list_size(list_size)?;
    check_index(index, list_size)?;
    Ok(run_rounds(index, list_size, seed, true))
}

/// Computes the index whose destination under the seeded permutation is
/// `index`. Inverse of [`permuted_index`].
///
/// # Errors
///
/// Validates inputs exactly as [`permuted_index`] does.
pub fn unpermuted_index(index: u64, list_size: u64, seed: &[u8]) -> ShuffleResult<u64> {
    check_list_size(list_size)?;
    check_index(index, list_size)?;
    Ok(run_rounds(index, list_size, seed, false))
}

pub(crate) fn check_list_size(list_size: u64) -> ShuffleResult<()> {
    if list_size > MAX_LIST_SIZE {
        return Err(ShuffleError::ListTooLarge {
            list_size,
            max: MAX_LIST_SIZE,
        });
    }
    Ok(())
}

fn check_index(index: u64, list_size: u64) -> ShuffleResult<()> {
    if index >= list_size {
        return Err(ShuffleError::IndexOutOfRange { index, list_size });
    }
    Ok(())
}

/// Runs all rounds over a single index. `forward` selects ascending
/// round order (permute) or descending (unpermute).
fn run_rounds(mut index: u64, list_size: u64, seed: &[u8], forward: bool) -> u64 {
    let mut hasher = RoundHasher::new(seed);
    let mut round = if forward { 0 } else { SHUFFLE_ROUND_COUNT - 1 };
    loop {
        hasher.set_round(round);
        let pivot = hasher.pivot(list_size);
        // Underflow-free form of (pivot - index) mod list_size. Both
        // terms stay below 2^40, so the sum cannot overflow.
        let flip = (pivot + (list_size - index)) % list_size;
        let position = index.max(flip);
        let source = hasher.source(position);
        let byte = source[((position & 0xff) >> 3) as usize];
        let bit = (byte >> (position & 0x7)) & 0x1;
        if bit == 1 {
            index = flip;
        }
        if forward {
            round += 1;
            if round == SHUFFLE_ROUND_COUNT {
                break;
            }
        } else {
            if round == 0 {
                break;
            }
            round -= 1;
        }
    }
    index
}
