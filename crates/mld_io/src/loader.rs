use anyhow::{Context, Result, ensure};
use bitvec::prelude::*;
use mld_core::config::DecoderConfig;
use mld_core::outcome::{DataReadout, OutcomeRecord, Syndrome, merge_duplicates};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::parser;

/// Loads a Stim .b8 file (packed shot data).
pub fn load_b8_file<P: AsRef<Path>>(path: P) -> Result<BitVec<u8, Lsb0>> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open .b8 file {}", path.display()))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    // Stim packs each byte little-endian
    Ok(BitVec::<u8, Lsb0>::from_vec(buffer))
}

/// Splits packed bits into shots of `bits_per_shot`, skipping each shot's
/// byte padding. A trailing partial shot is dropped.
pub fn slice_shots(raw_bits: &BitVec<u8, Lsb0>, bits_per_shot: usize) -> Vec<Vec<bool>> {
    let bytes_per_shot = bits_per_shot.div_ceil(8);
    let stride_bits = bytes_per_shot * 8;

    let num_shots = raw_bits.len() / stride_bits;
    let mut shots = Vec::with_capacity(num_shots);

    for i in 0..num_shots {
        let start = i * stride_bits;
        let end = start + bits_per_shot;

        shots.push(raw_bits[start..end].iter().by_vals().collect());
    }

    shots
}

/// Packs shots into the .b8 layout, each shot padded to a whole byte.
pub fn pack_shots<S: AsRef<[bool]>>(shots: &[S]) -> Vec<u8> {
    let mut bits = BitVec::<u8, Lsb0>::new();
    for shot in shots {
        bits.extend(shot.as_ref().iter().copied());
        let pad = bits.len().next_multiple_of(8) - bits.len();
        bits.extend(std::iter::repeat_n(false, pad));
    }
    bits.into_vec()
}

/// Aggregates individual shots into outcome records.
///
/// Each shot holds exactly the data readout bits followed by the syndrome
/// bits; a shot of any other length rejects the batch. Identical shots are
/// folded into one record, in first-seen order.
pub fn records_from_shots(
    shots: &[Vec<bool>],
    config: &DecoderConfig,
) -> Result<Vec<OutcomeRecord>> {
    config.validate()?;
    let bits_per_shot = config.distance + config.syndrome_bits;

    let mut records = Vec::with_capacity(shots.len());
    for (idx, shot) in shots.iter().enumerate() {
        ensure!(
            shot.len() == bits_per_shot,
            "shot {} has {} bits, expected {}",
            idx,
            shot.len(),
            bits_per_shot
        );
        let (data, syndrome) = shot.split_at(config.distance);
        records.push(OutcomeRecord::new(
            DataReadout::from_bools(data),
            Syndrome::from_bools(syndrome),
            1,
        ));
    }

    Ok(merge_duplicates(records)?)
}

/// Loads a .b8 shot file laid out as `distance + syndrome_bits` bits per shot.
pub fn load_b8_records<P: AsRef<Path>>(
    path: P,
    config: &DecoderConfig,
) -> Result<Vec<OutcomeRecord>> {
    config.validate()?;
    let raw_bits = load_b8_file(path)?;
    let shots = slice_shots(&raw_bits, config.distance + config.syndrome_bits);
    records_from_shots(&shots, config)
}

/// Writes shots as a .b8 file.
pub fn write_b8<P: AsRef<Path>, S: AsRef<[bool]>>(path: P, shots: &[S]) -> Result<()> {
    let mut file = File::create(path).context("Failed to create .b8 file")?;
    file.write_all(&pack_shots(shots))?;
    Ok(())
}

/// Loads a text counts file.
pub fn load_counts<P: AsRef<Path>>(path: P, config: &DecoderConfig) -> Result<Vec<OutcomeRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read counts file {}", path.display()))?;
    parser::parse_counts(&content, config)
        .with_context(|| format!("Failed to parse counts file {}", path.display()))
}

/// Writes records as a text counts file.
pub fn write_counts<P: AsRef<Path>>(path: P, records: &[OutcomeRecord]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, parser::format_counts(records))
        .with_context(|| format!("Failed to write counts file {}", path.display()))
}

/// Loads outcome records from either format, choosing by file extension:
/// `.b8` is packed shots, anything else is a counts file.
pub fn load_records<P: AsRef<Path>>(path: P, config: &DecoderConfig) -> Result<Vec<OutcomeRecord>> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("b8") => load_b8_records(path, config),
        _ => load_counts(path, config),
    }
}
