//! Parser for outcome strings and counts files.
//!
//! An outcome string is the simulator's rendering of one shot: the data-qubit
//! readout field first and the syndrome field last, separated by whitespace,
//! optionally followed by an all-zero placeholder as wide as the syndrome. A
//! counts file holds one `<outcome string>: <count>` entry per line.

use std::fmt::Write;

use anyhow::{Context, Result, anyhow};
use mld_core::MldError;
use mld_core::config::DecoderConfig;
use mld_core::outcome::{OutcomeRecord, merge_duplicates};
use mld_core::readout::{check_placeholder, parse_data_readout, parse_syndrome};
use nom::IResult;
use nom::bytes::complete::take_till1;
use nom::character::complete::{char, digit1, multispace0, multispace1, space0};
use nom::combinator::{all_consuming, map_res};
use nom::multi::separated_list1;
use nom::sequence::{delimited, separated_pair};

fn outcome_fields(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(multispace1, take_till1(|c: char| c.is_whitespace())),
        multispace0,
    ))(input)
}

fn counts_line(input: &str) -> IResult<&str, (&str, u64)> {
    all_consuming(separated_pair(
        take_till1(|c: char| c == ':'),
        char(':'),
        delimited(space0, map_res(digit1, |s: &str| s.parse::<u64>()), space0),
    ))(input)
}

/// Parses one raw outcome string into an outcome record.
///
/// Accepts `<data> <syndrome>` and `<data> <syndrome> <zeros>`; the trailing
/// placeholder must be all `0` and exactly as wide as the syndrome, and is
/// otherwise ignored.
///
/// # Arguments
///
/// * `raw` - Outcome string, e.g. `"101 00100000"`
/// * `config` - Declared distance and syndrome width
/// * `count` - Number of shots that produced this outcome
pub fn parse_outcome(
    raw: &str,
    config: &DecoderConfig,
    count: u64,
) -> Result<OutcomeRecord, MldError> {
    let fields = match outcome_fields(raw) {
        Ok((_, fields)) => fields,
        Err(_) => return Err(MldError::MalformedOutcome { fields: 0 }),
    };

    let (data, syndrome) = match fields.as_slice() {
        [data, syndrome] => (*data, *syndrome),
        [data, syndrome, placeholder] => {
            check_placeholder(placeholder, config.syndrome_bits)?;
            (*data, *syndrome)
        }
        other => return Err(MldError::MalformedOutcome { fields: other.len() }),
    };

    Ok(OutcomeRecord::new(
        parse_data_readout(data, config.distance)?,
        parse_syndrome(syndrome, config.syndrome_bits)?,
        count,
    ))
}

/// Parses the contents of a counts file.
///
/// Blank lines and lines starting with `#` are skipped. Repeated outcome
/// strings accumulate into one record. Any malformed line, or a line that
/// pushes the file's total shot count past `u64::MAX`, rejects the whole file.
pub fn parse_counts(content: &str, config: &DecoderConfig) -> Result<Vec<OutcomeRecord>> {
    config.validate()?;

    let mut records = Vec::new();
    let mut total_shots = 0u64;
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (_, (outcome, count)) = counts_line(trimmed).map_err(|e| {
            anyhow!(
                "line {}: expected `<outcome>: <count>`, got {:?} ({})",
                idx + 1,
                trimmed,
                e
            )
        })?;

        let record = parse_outcome(outcome, config, count)
            .with_context(|| format!("line {}: invalid outcome {:?}", idx + 1, outcome))?;
        total_shots = total_shots
            .checked_add(count)
            .ok_or(MldError::CountOverflow)
            .with_context(|| format!("line {}: total shot count overflows", idx + 1))?;
        records.push(record);
    }

    Ok(merge_duplicates(records)?)
}

/// Renders records in counts-file format, one `<data> <syndrome>: <count>`
/// line each.
pub fn format_counts(records: &[OutcomeRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{} {}: {}",
            record.data_readout, record.syndrome, record.count
        );
    }
    out
}
