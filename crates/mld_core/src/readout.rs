use crate::bit_utils::BitPack;
use crate::outcome::{DataReadout, Syndrome};
use crate::{Field, MldError};

fn check_width(raw: &str, expected: usize, field: Field) -> Result<(), MldError> {
    let actual = raw.chars().count();
    if actual != expected {
        return Err(MldError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Decodes the data-qubit readout field of an outcome string.
///
/// # Arguments
///
/// * `raw` - `0`/`1` characters, one per data qubit
/// * `distance` - Declared code distance; `raw` must be exactly this long
pub fn parse_data_readout(raw: &str, distance: usize) -> Result<DataReadout, MldError> {
    check_width(raw, distance, Field::DataReadout)?;
    let bits = BitPack::pack_str(raw, Field::DataReadout)?;
    Ok(DataReadout::from_bits(bits, distance))
}

/// Reduces a data-qubit readout to its logical value.
///
/// The logical value is the parity of the readout bits: `true` when an odd
/// number of them read `1`. This is a classical parity check on the already
/// measured bits.
pub fn parse_logical(data_readout: &str, distance: usize) -> Result<bool, MldError> {
    parse_data_readout(data_readout, distance).map(|readout| readout.parity())
}

/// Decodes the stabilizer syndrome field of an outcome string.
///
/// Character `i` of `raw` becomes bit `i` of the syndrome. Fails with
/// `LengthMismatch` unless `raw` is exactly `syndrome_bits` long.
pub fn parse_syndrome(raw: &str, syndrome_bits: usize) -> Result<Syndrome, MldError> {
    check_width(raw, syndrome_bits, Field::Syndrome)?;
    let bits = BitPack::pack_str(raw, Field::Syndrome)?;
    Ok(Syndrome::from_bits(bits, syndrome_bits))
}

/// Accepts the all-zero placeholder field some producers append after the
/// syndrome.
///
/// The field must be exactly `syndrome_bits` long and contain only `0`; its
/// content is otherwise ignored.
pub fn check_placeholder(raw: &str, syndrome_bits: usize) -> Result<(), MldError> {
    check_width(raw, syndrome_bits, Field::Placeholder)?;
    match raw.chars().find(|&c| c != '0') {
        Some(found) => Err(MldError::InvalidBit {
            field: Field::Placeholder,
            found,
        }),
        None => Ok(()),
    }
}
