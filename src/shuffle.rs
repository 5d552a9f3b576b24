//! Whole-list swap-or-not shuffling.
//!
//! Applies the same permutation as [`permuted_index`](crate::permuted_index)
//! to every element of a slice in one pass per round. Instead of
//! evaluating each index independently (which would hash every index in
//! every round), each round walks the pivot's two mirrored segments and
//! swaps paired elements directly, reusing one source digest per
//! 256-position block.
//!
//! Runs in `O(rounds * len)` time with `O(1)` auxiliary space beyond
//! the round-hash buffer.

use crate::error::ShuffleResult;
use crate::hashing::RoundHasher;
use crate::permute::{SHUFFLE_ROUND_COUNT, check_list_size};

/// Shuffles `values` in place under the permutation selected by `seed`.
///
/// The element at `index` before the call ends up at
/// `permuted_index(index, values.len(), seed)` after it.
///
/// # Errors
///
/// Returns [`ShuffleError::ListTooLarge`](crate::ShuffleError::ListTooLarge)
/// if the slice is longer than [`MAX_LIST_SIZE`](crate::MAX_LIST_SIZE).
/// An empty slice is a no-op.
///
/// # Example
///
/// ```
/// use swapnot::{shuffle_list, unshuffle_list};
///
/// let mut values: Vec<u64> = (0..10).collect();
/// shuffle_list(&mut values, b"example seed")?;
/// unshuffle_list(&mut values, b"example seed")?;
/// assert_eq!(values, (0..10).collect::<Vec<u64>>());
/// # Ok::<(), swapnot::ShuffleError>(())
/// ```
pub fn shuffle_list<T>(values: &mut [T], seed: &[u8]) -> ShuffleResult<()> {
    shuffle_rounds(values, seed, true)
}

/// Restores the order `values` had before [`shuffle_list`] with the
/// same seed. Runs the rounds in descending order, undoing each swap.
///
/// # Errors
///
/// Validates the slice length exactly as [`shuffle_list`] does.
pub fn unshuffle_list<T>(values: &mut [T], seed: &[u8]) -> ShuffleResult<()> {
    shuffle_rounds(values, seed, false)
}

fn shuffle_rounds<T>(values: &mut [T], seed: &[u8], forward: bool) -> ShuffleResult<()> {
    let list_size = values.len() as u64;
    check_list_size(list_size)?;
    if list_size == 0 {
        return Ok(());
    }
    let mut hasher = RoundHasher::new(seed);
    let mut round = if forward { 0 } else { SHUFFLE_ROUND_COUNT - 1 };
    loop {
        hasher.set_round(round);
        let pivot = hasher.pivot(list_size);

        // Positions pair up as (i, j) with i + j == pivot in the
        // segment at or below the pivot, and i + j == pivot + list_size
        // above it. Walking j downward from the top of each segment
        // until i meets the segment's mirror point visits every pair
        // exactly once, with j (the larger side) as the pair's position.
        swap_segment(values, &mut hasher, 0, pivot, (pivot + 1) >> 1);
        swap_segment(
            values,
            &mut hasher,
            pivot + 1,
            list_size - 1,
            (pivot + list_size + 1) >> 1,
        );

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
    Ok(())
}

/// Walks pairs `(i, j)` inward from `(first_i, first_j)` until `i`
/// reaches `mirror`, swapping each pair whose decision bit is set.
///
/// Because j only ever decreases by one, the source digest needs
/// refreshing only when j crosses a 256-position block boundary, and
/// the cached byte only when j crosses an 8-position boundary.
fn swap_segment<T>(
    values: &mut [T],
    hasher: &mut RoundHasher,
    first_i: u64,
    first_j: u64,
    mirror: u64,
) {
    if first_i >= mirror {
        return;
    }
    let mut source = hasher.source(first_j);
    let mut byte = source[((first_j & 0xff) >> 3) as usize];
    let mut i = first_i;
    let mut j = first_j;
    while i < mirror {
        if j & 0xff == 0xff {
            source = hasher.source(j);
        }
        if j & 0x7 == 0x7 {
            byte = source[((j & 0xff) >> 3) as usize];
        }
        let bit = (byte >> (j & 0x7)) & 0x1;
        if bit == 1 {
            values.swap(i as usize, j as usize);
        }
        i += 1;
        j -= 1;
    }
}
