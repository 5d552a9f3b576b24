//! Conformance fixtures for the swap-or-not shuffle.
//!
//! A fixture case records a seed, a list size, an input ordering of
//! `0..list_size`, and the ordering the shuffle must produce from it.
//! Corpora of cases cross seeds with list sizes and are the interchange
//! format for validating independent implementations: any
//! implementation that reproduces every `shuffled` column agrees with
//! this one bit for bit.
//!
//! The canonical interchange form is one CSV row per case,
//! `hex(seed),list_size,input,shuffled`, with the ordering columns
//! `":"`-joined and empty lists encoded as empty fields. A JSON record
//! form is available for tooling that prefers structured documents;
//! [`CorpusFormat`] selects between the two.
//!
//! Verification replays each case against all four engine operations:
//! `permuted_index`, `unpermuted_index`, `shuffle_list`, and
//! `unshuffle_list`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod det_rng;

use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use hex::FromHex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use swapnot::hashing::sha256;
use swapnot::{
    MAX_LIST_SIZE, ShuffleError, permuted_index, shuffle_list, unpermuted_index, unshuffle_list,
};

use crate::det_rng::DetRng;

/// Fixed seed for the input-ordering shuffle.
///
/// Input orderings only diversify the fixture data; the generator
/// behind them is not part of the cross-implementation contract, but
/// this seed pins the committed corpus.
pub const ORDER_SEED: u64 = 123;

/// Seed count of the reference corpus.
pub const DEFAULT_SEED_COUNT: u32 = 10;

/// List sizes of the reference corpus.
pub const DEFAULT_LIST_SIZES: &[u64] = &[0, 1, 2, 3, 5, 10, 100, 1000];

/// Derives the permutation seed for fixture `seed_index`.
///
/// Seeds are `sha256(u32_le(seed_index))` so corpora of any seed count
/// share a prefix.
#[must_use]
pub fn fixture_seed(seed_index: u32) -> [u8; 32] {
    sha256(&seed_index.to_le_bytes())
}

/// The four engine operations checked against each fixture case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Forward single-index permutation.
    PermutedIndex,
    /// Inverse single-index permutation.
    UnpermutedIndex,
    /// Whole-list forward shuffle.
    ShuffleList,
    /// Whole-list inverse shuffle.
    UnshuffleList,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PermutedIndex => "permuted_index",
            Self::UnpermutedIndex => "unpermuted_index",
            Self::ShuffleList => "shuffle_list",
            Self::UnshuffleList => "unshuffle_list",
        };
        f.write_str(name)
    }
}

/// An error from fixture parsing, verification, or corpus I/O.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A row does not have the four comma-separated fixture fields.
    #[error("expected 4 comma-separated fields, found {found}")]
    ColumnCount {
        /// Number of fields found.
        found: usize,
    },

    /// The seed field is not 64 hex digits.
    #[error("invalid seed: {source}")]
    InvalidSeed {
        /// Underlying hex decoding failure.
        source: hex::FromHexError,
    },

    /// A numeric field failed to parse.
    #[error("invalid integer {value:?} in {field} field")]
    InvalidInteger {
        /// Which field the value came from.
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// An ordering column does not contain exactly `list_size` items.
    #[error("{field} column has {found} items, list size is {list_size}")]
    LengthMismatch {
        /// Which column disagrees.
        field: &'static str,
        /// Number of items found.
        found: usize,
        /// The row's declared list size.
        list_size: u64,
    },

    /// Recomputation disagreed with the recorded expectation.
    #[error("{operation} mismatch at position {position}")]
    Mismatch {
        /// Which engine operation disagreed.
        operation: Operation,
        /// First disagreeing position.
        position: u64,
    },

    /// A corpus row failed to parse.
    #[error("row {row}: {source}")]
    Row {
        /// One-based row number within the corpus.
        row: usize,
        /// The row's failure.
        source: Box<FixtureError>,
    },

    /// The engine rejected the case's parameters.
    #[error(transparent)]
    Shuffle(#[from] ShuffleError),

    /// A JSON record form failed to encode or decode.
    #[error("invalid JSON record: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a corpus file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One conformance case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Permutation seed; hex-encoded in the JSON record form.
    #[serde(with = "hex_seed")]
    pub seed: [u8; 32],
    /// Number of elements being permuted.
    pub list_size: u64,
    /// Input ordering of `0..list_size`.
    pub input: Vec<u64>,
    /// Expected ordering after shuffling `input`.
    pub shuffled: Vec<u64>,
}

impl FixtureCase {
    /// Builds the case for `(seed, list_size)`.
    ///
    /// The input ordering is `0..list_size` run through the
    /// [`DetRng`]-driven Fisher-Yates with [`ORDER_SEED`], fresh per
    /// case. The expected column places each input element at its
    /// permuted index, so `shuffled[permuted_index(i)] == input[i]`.
    pub fn build(seed: [u8; 32], list_size: u64) -> Result<Self, ShuffleError> {
        if list_size > MAX_LIST_SIZE {
            return Err(ShuffleError::ListTooLarge {
                list_size,
                max: MAX_LIST_SIZE,
            });
        }
        let mut input: Vec<u64> = (0..list_size).collect();
        DetRng::new(ORDER_SEED).shuffle(&mut input);
        let mut shuffled = vec![0u64; input.len()];
        for (index, value) in input.iter().enumerate() {
            let destination = permuted_index(index as u64, list_size, &seed)?;
            shuffled[destination as usize] = *value;
        }
        Ok(Self {
            seed,
            list_size,
            input,
            shuffled,
        })
    }

    /// Verifies the case against all four engine operations.
    ///
    /// Checks, in order: column shapes, `permuted_index` placing every
    /// input element at its recorded destination, `unpermuted_index`
    /// mapping every destination back, `shuffle_list` reproducing the
    /// shuffled column, and `unshuffle_list` restoring the input
    /// column. The first disagreement is reported.
    pub fn verify(&self) -> Result<(), FixtureError> {
        check_shape(self)?;

        for (index, value) in self.input.iter().enumerate() {
            let destination = permuted_index(index as u64, self.list_size, &self.seed)?;
            if self.shuffled[destination as usize] != *value {
                return Err(FixtureError::Mismatch {
                    operation: Operation::PermutedIndex,
                    position: index as u64,
                });
            }
        }

        for (index, value) in self.shuffled.iter().enumerate() {
            let origin = unpermuted_index(index as u64, self.list_size, &self.seed)?;
            if self.input[origin as usize] != *value {
                return Err(FixtureError::Mismatch {
                    operation: Operation::UnpermutedIndex,
                    position: index as u64,
                });
            }
        }

        let mut values = self.input.clone();
        shuffle_list(&mut values, &self.seed)?;
        if let Some(position) = first_difference(&values, &self.shuffled) {
            return Err(FixtureError::Mismatch {
                operation: Operation::ShuffleList,
                position,
            });
        }

        let mut values = self.shuffled.clone();
        unshuffle_list(&mut values, &self.seed)?;
        if let Some(position) = first_difference(&values, &self.input) {
            return Err(FixtureError::Mismatch {
                operation: Operation::UnshuffleList,
                position,
            });
        }

        Ok(())
    }
}

fn check_shape(case: &FixtureCase) -> Result<(), FixtureError> {
    for (field, items) in [("input", &case.input), ("shuffled", &case.shuffled)] {
        if items.len() as u64 != case.list_size {
            return Err(FixtureError::LengthMismatch {
                field,
                found: items.len(),
                list_size: case.list_size,
            });
        }
    }
    Ok(())
}

fn first_difference(a: &[u64], b: &[u64]) -> Option<u64> {
    if a.len() != b.len() {
        return Some(a.len().min(b.len()) as u64);
    }
    a.iter().zip(b).position(|(x, y)| x != y).map(|p| p as u64)
}

/// Encodes a case as its canonical CSV row, without a trailing newline.
#[must_use]
pub fn encode_csv_row(case: &FixtureCase) -> String {
    format!(
        "{},{},{},{}",
        hex::encode(case.seed),
        case.list_size,
        join_items(&case.input),
        join_items(&case.shuffled)
    )
}

fn join_items(items: &[u64]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(":")
}

/// Parses one canonical CSV row.
///
/// The parser is strict: exactly four fields, a 64-hex-digit seed,
/// decimal items, and item counts matching the declared list size.
pub fn parse_csv_row(line: &str) -> Result<FixtureCase, FixtureError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 4 {
        return Err(FixtureError::ColumnCount {
            found: fields.len(),
        });
    }
    let seed = <[u8; 32]>::from_hex(fields[0])
        .map_err(|source| FixtureError::InvalidSeed { source })?;
    let list_size = fields[1]
        .parse::<u64>()
        .map_err(|_| FixtureError::InvalidInteger {
            field: "list_size",
            value: fields[1].to_string(),
        })?;
    let input = parse_items(fields[2], "input")?;
    let shuffled = parse_items(fields[3], "shuffled")?;
    let case = FixtureCase {
        seed,
        list_size,
        input,
        shuffled,
    };
    check_shape(&case)?;
    Ok(case)
}

fn parse_items(text: &str, field: &'static str) -> Result<Vec<u64>, FixtureError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(':')
        .map(|item| {
            item.parse::<u64>().map_err(|_| FixtureError::InvalidInteger {
                field,
                value: item.to_string(),
            })
        })
        .collect()
}

/// Builds the seeds-by-sizes cross-product corpus.
///
/// Seeds are [`fixture_seed`]`(0..seed_count)`; every seed is paired
/// with every list size, in seed-major order.
pub fn build_corpus(seed_count: u32, list_sizes: &[u64]) -> Result<Vec<FixtureCase>, ShuffleError> {
    let mut cases = Vec::with_capacity(seed_count as usize * list_sizes.len());
    for seed_index in 0..seed_count {
        let seed = fixture_seed(seed_index);
        for &list_size in list_sizes {
            cases.push(FixtureCase::build(seed, list_size)?);
        }
    }
    Ok(cases)
}

/// Encodes a corpus in canonical CSV form, one row per case.
#[must_use]
pub fn encode_corpus(cases: &[FixtureCase]) -> String {
    let mut out = String::new();
    for case in cases {
        out.push_str(&encode_csv_row(case));
        out.push('\n');
    }
    out
}

/// Parses a corpus, one CSV row per non-empty line.
///
/// Errors are wrapped with their one-based row number.
pub fn parse_corpus(text: &str) -> Result<Vec<FixtureCase>, FixtureError> {
    let mut cases = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let case = parse_csv_row(line).map_err(|source| FixtureError::Row {
            row: index + 1,
            source: Box::new(source),
        })?;
        cases.push(case);
    }
    Ok(cases)
}

/// Loads a corpus from a CSV file.
pub fn load_corpus(path: &Path) -> Result<Vec<FixtureCase>, FixtureError> {
    parse_corpus(&fs::read_to_string(path)?)
}

/// Writes a corpus in canonical CSV form.
pub fn write_corpus(path: &Path, cases: &[FixtureCase]) -> Result<(), FixtureError> {
    fs::write(path, encode_corpus(cases))?;
    Ok(())
}

/// Serialization form of a corpus document.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorpusFormat {
    /// Canonical CSV rows.
    #[default]
    Csv,
    /// JSON array of fixture records.
    Json,
}

/// Encodes a corpus in the given format.
///
/// Both forms end with a newline; JSON is a pretty-printed array of
/// records.
pub fn encode_corpus_as(
    cases: &[FixtureCase],
    format: CorpusFormat,
) -> Result<String, FixtureError> {
    match format {
        CorpusFormat::Csv => Ok(encode_corpus(cases)),
        CorpusFormat::Json => {
            let mut text = serde_json::to_string_pretty(cases)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Parses a corpus in the given format.
///
/// JSON records get the same column-shape validation as CSV rows, with
/// errors carrying the one-based position of the offending record.
pub fn parse_corpus_as(text: &str, format: CorpusFormat) -> Result<Vec<FixtureCase>, FixtureError> {
    match format {
        CorpusFormat::Csv => parse_corpus(text),
        CorpusFormat::Json => {
            let cases: Vec<FixtureCase> = serde_json::from_str(text)?;
            for (index, case) in cases.iter().enumerate() {
                check_shape(case).map_err(|source| FixtureError::Row {
                    row: index + 1,
                    source: Box::new(source),
                })?;
            }
            Ok(cases)
        }
    }
}

mod hex_seed {
    use hex::FromHex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seed: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(seed))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        <[u8; 32]>::from_hex(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Seed schedule
    // =========================================================================

    #[test]
    fn fixture_seeds_are_pinned() {
        assert_eq!(
            hex::encode(fixture_seed(0)),
            "df3f619804a92fdb4057192dc43dd748ea778adc52bc498ce80524c014b81119"
        );
        assert_eq!(
            hex::encode(fixture_seed(1)),
            "67abdd721024f0ff4e0b3f4c2fc13bc5bad42d0b7851d456d88d203d15aaa450"
        );
        assert_ne!(fixture_seed(2), fixture_seed(3));
    }

    // =========================================================================
    // Case construction
    // =========================================================================

    #[test]
    fn built_case_is_pinned_for_seed_zero() {
        let case = FixtureCase::build(fixture_seed(0), 3).unwrap();
        assert_eq!(case.input, vec![1, 2, 0]);
        assert_eq!(case.shuffled, vec![2, 0, 1]);
        case.verify().unwrap();
    }

    #[test]
    fn empty_case_has_empty_columns() {
        let case = FixtureCase::build(fixture_seed(0), 0).unwrap();
        assert!(case.input.is_empty());
        assert!(case.shuffled.is_empty());
        case.verify().unwrap();
    }

    #[test]
    fn build_rejects_oversized_list() {
        let err = FixtureCase::build(fixture_seed(0), MAX_LIST_SIZE + 1).unwrap_err();
        assert!(err.is_list_too_large());
    }

    #[test]
    fn input_ordering_uses_fresh_rng_per_case() {
        // Cases of equal size share their input column; the order seed
        // restarts for every case.
        let a = FixtureCase::build(fixture_seed(0), 10).unwrap();
        let b = FixtureCase::build(fixture_seed(1), 10).unwrap();
        assert_eq!(a.input, b.input);
        assert_ne!(a.shuffled, b.shuffled);
    }

    // =========================================================================
    // Codec
    // =========================================================================

    #[test]
    fn csv_round_trips() {
        for list_size in [0, 1, 5, 100] {
            let case = FixtureCase::build(fixture_seed(3), list_size).unwrap();
            let row = encode_csv_row(&case);
            assert_eq!(parse_csv_row(&row).unwrap(), case);
        }
    }

    #[test]
    fn empty_list_encodes_as_empty_fields() {
        let case = FixtureCase::build(fixture_seed(0), 0).unwrap();
        let row = encode_csv_row(&case);
        assert!(row.ends_with(",0,,"));
    }

    #[test]
    fn parse_rejects_wrong_column_count() {
        let err = parse_csv_row("aa,1,0").unwrap_err();
        assert!(matches!(err, FixtureError::ColumnCount { found: 3 }));
    }

    #[test]
    fn parse_rejects_bad_seed_hex() {
        let err = parse_csv_row("zz,1,0,0").unwrap_err();
        assert!(matches!(err, FixtureError::InvalidSeed { .. }));
        // Correct hex but wrong length is also rejected.
        let err = parse_csv_row("abcd,1,0,0").unwrap_err();
        assert!(matches!(err, FixtureError::InvalidSeed { .. }));
    }

    #[test]
    fn parse_rejects_bad_items() {
        let seed_hex = hex::encode(fixture_seed(0));
        let err = parse_csv_row(&format!("{seed_hex},2,0:x,1:0")).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::InvalidInteger { field: "input", .. }
        ));
    }

    #[test]
    fn parse_rejects_length_mismatch() {
        let seed_hex = hex::encode(fixture_seed(0));
        let err = parse_csv_row(&format!("{seed_hex},3,0:1,1:0:2")).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::LengthMismatch {
                field: "input",
                found: 2,
                list_size: 3,
            }
        ));
    }

    #[test]
    fn corpus_errors_carry_row_numbers() {
        let seed_hex = hex::encode(fixture_seed(0));
        let text = format!("{seed_hex},1,0,0\n\nbroken\n");
        let err = parse_corpus(&text).unwrap_err();
        match err {
            FixtureError::Row { row, source } => {
                assert_eq!(row, 3);
                assert!(matches!(*source, FixtureError::ColumnCount { .. }));
            }
            other => panic!("expected row error, got {other}"),
        }
    }

    #[test]
    fn corpus_parses_with_crlf_line_endings() {
        let cases = build_corpus(2, &[0, 3, 10]).unwrap();
        let crlf = encode_corpus(&cases).replace('\n', "\r\n");
        assert_eq!(parse_corpus(&crlf).unwrap(), cases);
    }

    #[test]
    fn json_record_form_uses_hex_seed() {
        let case = FixtureCase::build(fixture_seed(0), 2).unwrap();
        let json = serde_json::to_string(&case).unwrap();
        assert!(json.contains("\"df3f6198"));
        let back: FixtureCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);
    }

    #[test]
    fn corpus_round_trips_in_both_formats() {
        let cases = build_corpus(2, &[0, 3, 10]).unwrap();
        for format in [CorpusFormat::Csv, CorpusFormat::Json] {
            let text = encode_corpus_as(&cases, format).unwrap();
            assert!(text.ends_with('\n'));
            assert_eq!(parse_corpus_as(&text, format).unwrap(), cases);
        }
    }

    #[test]
    fn json_parse_rejects_shape_drift() {
        let mut cases = build_corpus(1, &[1, 3]).unwrap();
        cases[1].shuffled.pop();
        let text = encode_corpus_as(&cases, CorpusFormat::Json).unwrap();
        let err = parse_corpus_as(&text, CorpusFormat::Json).unwrap_err();
        match err {
            FixtureError::Row { row, source } => {
                assert_eq!(row, 2);
                assert!(matches!(
                    *source,
                    FixtureError::LengthMismatch {
                        field: "shuffled",
                        ..
                    }
                ));
            }
            other => panic!("expected row error, got {other}"),
        }
    }

    // =========================================================================
    // Verification
    // =========================================================================

    #[test]
    fn verify_catches_corrupted_expectation() {
        let mut case = FixtureCase::build(fixture_seed(0), 10).unwrap();
        case.shuffled.swap(0, 1);
        let err = case.verify().unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Mismatch {
                operation: Operation::PermutedIndex,
                ..
            }
        ));
    }

    #[test]
    fn verify_catches_column_shape_drift() {
        let mut case = FixtureCase::build(fixture_seed(0), 10).unwrap();
        case.shuffled.pop();
        let err = case.verify().unwrap_err();
        assert!(matches!(
            err,
            FixtureError::LengthMismatch {
                field: "shuffled",
                ..
            }
        ));
    }

    #[test]
    fn default_corpus_dimensions() {
        let cases = build_corpus(2, DEFAULT_LIST_SIZES).unwrap();
        assert_eq!(cases.len(), 2 * DEFAULT_LIST_SIZES.len());
        for case in &cases {
            case.verify().unwrap();
        }
    }

    #[test]
    fn corpus_build_is_deterministic() {
        let a = build_corpus(3, &[0, 5, 10]).unwrap();
        let b = build_corpus(3, &[0, 5, 10]).unwrap();
        assert_eq!(a, b);
    }
}
