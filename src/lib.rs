//! Swapnot: deterministic swap-or-not shuffling.
//!
//! # Overview
//!
//! Swapnot permutes the indices `0..list_size` with the swap-or-not
//! construction: 90 rounds, each deriving a pivot and per-position
//! decision bits from SHA-256 over `seed ‖ round ‖ block`. The same
//! permutation is available two ways:
//!
//! - [`permuted_index`] follows a single index through the rounds,
//!   without materializing the list. Committee-style assignment lookups
//!   use this to answer "where does element `i` go" in isolation.
//! - [`shuffle_list`] applies the permutation to a whole slice in
//!   place, one pass per round, sharing hash output across 256
//!   positions at a time.
//!
//! Both directions invert cleanly: [`unpermuted_index`] and
//! [`unshuffle_list`] run the same rounds in reverse order.
//!
//! # Determinism
//!
//! Output depends only on `(index, list_size, seed)`. There is no
//! global state, no platform-dependent arithmetic, and no RNG; the same
//! inputs yield the same permutation on every target.
//!
//! # Module Structure
//!
//! - [`permute`]: single-index permutation and its inverse
//! - [`shuffle`]: in-place list shuffling and unshuffling
//! - [`hashing`]: SHA-256 round-hash layout
//! - [`error`](mod@error): error types
//!
//! # Example
//!
//! ```
//! use swapnot::{permuted_index, shuffle_list};
//!
//! let seed = b"lookups match list order";
//! let mut values: Vec<u64> = (0..8).collect();
//! shuffle_list(&mut values, seed)?;
//! for index in 0..8 {
//!     let destination = permuted_index(index, 8, seed)?;
//!     assert_eq!(values[destination as usize], index);
//! }
//! # Ok::<(), swapnot::ShuffleError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod hashing;
pub mod permute;
pub mod shuffle;

pub use error::{ShuffleError, ShuffleResult};
pub use permute::{MAX_LIST_SIZE, SHUFFLE_ROUND_COUNT, permuted_index, unpermuted_index};
pub use shuffle::{shuffle_list, unshuffle_list};
