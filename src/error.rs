//! Error types for shuffle operations.
//!
//! Every fallible entry point validates its inputs before touching any
//! round state, so a returned error guarantees the inputs were never
//! partially processed.

use thiserror::Error;

/// An error from a permutation or list-shuffle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShuffleError {
    /// The index does not address an element of the list.
    ///
    /// Raised whenever `index >= list_size`, which also covers every
    /// index against an empty list.
    #[error("index {index} out of range for list of size {list_size}")]
    IndexOutOfRange {
        /// The rejected index.
        index: u64,
        /// The size of the list the index was checked against.
        list_size: u64,
    },

    /// The list size exceeds the supported maximum.
    ///
    /// Positions are mixed into the round hash as a 32-bit block number
    /// of 256 positions each, so sizes past `2^40` would alias blocks.
    #[error("list size {list_size} exceeds supported maximum {max}")]
    ListTooLarge {
        /// The rejected list size.
        list_size: u64,
        /// The maximum supported list size.
        max: u64,
    },
}

impl ShuffleError {
    /// Returns `true` if this error is an out-of-range index.
    #[must_use]
    pub const fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Returns `true` if this error is an oversized list.
    #[must_use]
    pub const fn is_list_too_large(&self) -> bool {
        matches!(self, Self::ListTooLarge { .. })
    }
}

/// Result type for shuffle operations.
pub type ShuffleResult<T> = Result<T, ShuffleError>;
