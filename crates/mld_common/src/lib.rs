//! Common definitions and constants shared across the decoding workspace.
//!
//! This crate provides the default readout layout of the distance-3 memory
//! experiment and the stabilizer geometry of the distance-3 surface code. The
//! core decoder uses the layout defaults, and the host-side sampler uses the
//! geometry to synthesize measurement strings.

#![no_std]

/// Default readout layout for the distance-3 memory experiment.
///
/// The decoder itself is width-agnostic; these values are the configuration
/// a caller gets when nothing else is specified.
pub mod layout {
    /// Default code distance, which is also the number of data-qubit readout
    /// bits that make up one logical measurement.
    pub const DEFAULT_DISTANCE: usize = 3;

    /// Default number of stabilizer measurement bits per shot.
    ///
    /// Four Z-type and four X-type checks for the distance-3 surface code.
    pub const DEFAULT_SYNDROME_BITS: usize = 8;

    /// Logical value a fault-free run is expected to read out.
    pub const DEFAULT_CORRECT_VALUE: bool = false;

    /// Widest syndrome the dense empirical distribution will accept.
    ///
    /// The distribution stores `2^S * 2` probabilities, so this caps the table
    /// at 2M entries (16 MiB of `f64`).
    pub const MAX_SYNDROME_BITS: usize = 20;

    /// Widest data readout that can be packed into one machine word.
    pub const MAX_READOUT_BITS: usize = 64;
}

/// Geometry of the distance-3 rotated surface code.
///
/// Data qubits are numbered row-major on the 3x3 lattice:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
///
/// Syndrome bit `i` of a measurement string is the outcome of check `i` in
/// the order `[mz0, mz1, mz2, mz3, mx0, mx1, mx2, mx3]`.
pub mod surface {
    /// Number of data qubits in the lattice.
    pub const NUM_DATA_QUBITS: usize = 9;

    /// Data-qubit supports of the Z-type checks (detect X errors).
    pub const Z_CHECKS: [&[usize]; 4] = [&[0, 1, 3, 4], &[2, 5], &[3, 6], &[4, 5, 7, 8]];

    /// Data-qubit supports of the X-type checks (detect Z errors).
    pub const X_CHECKS: [&[usize]; 4] = [&[0, 1], &[1, 2, 4, 5], &[3, 4, 6, 7], &[7, 8]];

    /// Syndrome bit index of the first X-type check.
    pub const X_CHECK_OFFSET: usize = Z_CHECKS.len();

    /// Data qubits read out in the Z basis to form the logical value.
    ///
    /// Their joint parity is a logical Z operator: it commutes with every
    /// X-type check.
    pub const READOUT_QUBITS: [usize; 3] = [0, 1, 2];
}
