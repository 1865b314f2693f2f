use ethers::types::U256;
use ethers::utils::parse_ether;

use crate::error::ConfigError;

/// Shortest name the registry accepts
pub const MIN_DOMAIN_LENGTH: usize = 3;

/// Price bracket for a name.
///
/// Only 3- and 4-character names are singled out; every other length pays
/// the standard fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeTier {
    ThreeChars,
    FourChars,
    Standard,
}

impl FeeTier {
    pub fn for_name(name: &str) -> Self {
        match domain_length(name) {
            3 => FeeTier::ThreeChars,
            4 => FeeTier::FourChars,
            _ => FeeTier::Standard,
        }
    }
}

/// Length of a name in characters
pub fn domain_length(name: &str) -> usize {
    name.chars().count()
}

/// Mint fee per tier, in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub three_chars: U256,
    pub four_chars: U256,
    pub standard: U256,
}

impl FeeSchedule {
    /// Build a schedule from decimal ether amounts, e.g. `("0.5", "0.3", "0.1")`
    pub fn from_ether(three_chars: &str, four_chars: &str, standard: &str) -> Result<Self, ConfigError> {
        let parse = |key: &'static str, value: &str| {
            parse_ether(value).map_err(|e| ConfigError::Invalid {
                key,
                message: e.to_string(),
            })
        };

        Ok(Self {
            three_chars: parse("MINT_FEE_3", three_chars)?,
            four_chars: parse("MINT_FEE_4", four_chars)?,
            standard: parse("MINT_FEE", standard)?,
        })
    }

    pub fn fee(&self, tier: FeeTier) -> U256 {
        match tier {
            FeeTier::ThreeChars => self.three_chars,
            FeeTier::FourChars => self.four_chars,
            FeeTier::Standard => self.standard,
        }
    }

    /// Fee to attach when registering `name`
    pub fn fee_for(&self, name: &str) -> U256 {
        self.fee(FeeTier::for_name(name))
    }
}

impl Default for FeeSchedule {
    /// 0.5 / 0.3 / 0.1 of the native token
    fn default() -> Self {
        let tenth = U256::exp10(17);
        Self {
            three_chars: tenth * 5,
            four_chars: tenth * 3,
            standard: tenth,
        }
    }
}
