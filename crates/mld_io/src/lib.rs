//! I/O utilities for loading sampled measurement outcomes.
//!
//! Provides functions for reading shot data produced by a circuit simulator,
//! either as text counts files (one outcome string per line with its shot
//! count) or as packed binary `.b8` shot files, and turning them into the
//! outcome records consumed by the decoder core.

/// File loading utilities for outcome data.
///
/// Reads counts files and packed `.b8` shot files, aggregates identical
/// shots into outcome records, and writes both formats back out for the
/// host-side sampler.
pub mod loader;

/// Parser for outcome strings and counts files.
///
/// Splits raw `<data> <syndrome> [<zeros>]` strings into their fields and
/// delegates field validation to the core readout decoders.
pub mod parser;
