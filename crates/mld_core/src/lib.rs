//! Core maximum-likelihood decoding algorithms and data structures.
//!
//! This crate turns sampled measurement outcomes of a surface-code memory
//! experiment into a trained lookup-table decoder and scores batches of
//! outcomes against it. The pipeline runs strictly forward: field decoding,
//! empirical distribution, lookup table, per-shot correction, error rate.
//! Everything here is a pure function of already-materialized data, so the
//! crate is `no_std` and allocates only through `alloc`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use core::fmt;

use crate::outcome::Syndrome;

/// Packed-bit helpers for syndromes, readouts and table bitsets.
///
/// Converts fixed-width `0`/`1` strings into `u64` words and provides the
/// single-bit accessors used by the lookup table's packed storage.
pub mod bit_utils;

/// Decoder configuration: code distance, syndrome width and target value.
pub mod config;

/// The decoding seam and the scorer.
///
/// Defines the `SyndromeDecoder` trait implemented by trained tables and the
/// scoring pass that turns a batch of outcomes into a logical error rate.
pub mod decoder;

/// Empirical joint distribution over (syndrome, logical value) pairs.
pub mod distribution;

/// Outcome records and the packed bit-string types they are built from.
pub mod outcome;

/// Field decoders for raw measurement strings.
///
/// Validates and packs the data-readout and syndrome fields of one sampled
/// outcome, and reduces a data readout to its logical parity.
pub mod readout;

/// Maximum-likelihood lookup table and its training pass.
pub mod table;

/// Names the field of an outcome string an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Data-qubit readout bits used to extract the logical value.
    DataReadout,
    /// Stabilizer measurement bits.
    Syndrome,
    /// All-zero placeholder that may trail the syndrome.
    Placeholder,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::DataReadout => write!(f, "data readout"),
            Field::Syndrome => write!(f, "syndrome"),
            Field::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Error types returned by decoding operations.
///
/// Every variant is fatal to the batch it was raised on: the core never
/// skips a record or returns a partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MldError {
    /// A field's length disagrees with the configured distance or syndrome
    /// width.
    ///
    /// The whole batch is rejected rather than the record skipped, because
    /// skipping would bias the empirical distribution.
    LengthMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },

    /// A field contains a character other than `0` or `1`.
    InvalidBit { field: Field, found: char },

    /// An outcome string does not have the `<data> <syndrome> [<zeros>]`
    /// shape.
    MalformedOutcome { fields: usize },

    /// A batch carries zero shots in total.
    EmptyBatch,

    /// Shot counts summed past `u64::MAX`.
    CountOverflow,

    /// A (syndrome, logical value) key is absent from a distribution that
    /// should be total over the full Cartesian product.
    ///
    /// Signals an internal invariant violation, typically a syndrome wider
    /// than the distribution it is looked up in.
    MissingEntry { syndrome: Syndrome, logical: bool },

    /// A syndrome seen while scoring never occurred in the training batch.
    ///
    /// The caller may retrain on a larger sample; no default correction is
    /// ever applied.
    UnknownSyndrome(Syndrome),

    /// A configured width is zero or exceeds what the packed representation
    /// supports.
    UnsupportedWidth { field: Field, width: usize },
}

impl fmt::Display for MldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MldError::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} length mismatch: expected {} bits, got {}",
                field, expected, actual
            ),
            MldError::InvalidBit { field, found } => {
                write!(f, "invalid bit {:?} in {}", found, field)
            }
            MldError::MalformedOutcome { fields } => write!(
                f,
                "malformed outcome string: {} fields, expected `<data> <syndrome> [<zeros>]`",
                fields
            ),
            MldError::EmptyBatch => write!(f, "batch contains no shots"),
            MldError::CountOverflow => write!(f, "shot count overflows u64"),
            MldError::MissingEntry { syndrome, logical } => write!(
                f,
                "distribution has no entry for syndrome {} with logical value {}",
                syndrome,
                u8::from(*logical)
            ),
            MldError::UnknownSyndrome(syndrome) => write!(
                f,
                "syndrome {} was never observed during training",
                syndrome
            ),
            MldError::UnsupportedWidth { field, width } => {
                write!(f, "unsupported {} width: {} bits", field, width)
            }
        }
    }
}

impl core::error::Error for MldError {}
