use mld_common::layout::{
    DEFAULT_CORRECT_VALUE, DEFAULT_DISTANCE, DEFAULT_SYNDROME_BITS, MAX_READOUT_BITS,
    MAX_SYNDROME_BITS,
};

use crate::{Field, MldError};

/// Readout layout and scoring target for one decoding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Code distance, equal to the number of data-readout bits per shot.
    pub distance: usize,
    /// Number of stabilizer measurement bits per shot.
    pub syndrome_bits: usize,
    /// Logical value a correctly decoded shot must read.
    pub correct_value: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            syndrome_bits: DEFAULT_SYNDROME_BITS,
            correct_value: DEFAULT_CORRECT_VALUE,
        }
    }
}

impl DecoderConfig {
    /// Rejects widths the packed representation cannot hold.
    pub fn validate(&self) -> Result<(), MldError> {
        if self.distance == 0 || self.distance > MAX_READOUT_BITS {
            return Err(MldError::UnsupportedWidth {
                field: Field::DataReadout,
                width: self.distance,
            });
        }
        validate_syndrome_bits(self.syndrome_bits)
    }
}

pub(crate) fn validate_syndrome_bits(syndrome_bits: usize) -> Result<(), MldError> {
    if syndrome_bits == 0 || syndrome_bits > MAX_SYNDROME_BITS {
        return Err(MldError::UnsupportedWidth {
            field: Field::Syndrome,
            width: syndrome_bits,
        });
    }
    Ok(())
}
