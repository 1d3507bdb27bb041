use crate::SettlementError;
use promptlock::{
    constants::{
        BPS_DENOMINATOR, DEFAULT_RENT_LAMPORTS_PER_BYTE, DEFAULT_SELLER_SHARE_BPS,
        PLATFORM_TREASURY, PROGRAM_ID,
    },
    types::identity::{ProgramId, WalletAddress},
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::{path::Path, str::FromStr};

/// Parameters of a deployed settlement program.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct ProgramConfig {
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_program_id")]
    pub program_id: ProgramId,
    /// Share of each sale paid to the seller, in basis points.
    #[serde(default = "default_seller_share_bps")]
    pub seller_share_bps: u64,
    /// Rent charged per serialized byte of a listing.
    #[serde(default = "default_rent_lamports_per_byte")]
    pub rent_lamports_per_byte: u64,
}

fn default_program_id() -> ProgramId {
    PROGRAM_ID
}

fn default_seller_share_bps() -> u64 {
    DEFAULT_SELLER_SHARE_BPS
}

fn default_rent_lamports_per_byte() -> u64 {
    DEFAULT_RENT_LAMPORTS_PER_BYTE
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: PROGRAM_ID,
            seller_share_bps: DEFAULT_SELLER_SHARE_BPS,
            rent_lamports_per_byte: DEFAULT_RENT_LAMPORTS_PER_BYTE,
        }
    }
}

impl FromStr for ProgramConfig {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl ProgramConfig {
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self, SettlementError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| SettlementError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        Self::from_str(&config_string)
    }

    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.seller_share_bps > BPS_DENOMINATOR {
            return Err(SettlementError::InvalidSellerShare(self.seller_share_bps));
        }
        Ok(())
    }

    /// The only account the program pays platform fees into. Not
    /// configurable.
    pub fn treasury(&self) -> WalletAddress {
        PLATFORM_TREASURY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses() {
        let config_str = format!(
            r#"
            program_id = "{}"
            seller_share_bps = 9000
            rent_lamports_per_byte = 10
            "#,
            ProgramId::from_bytes([3; 32])
        );

        let ProgramConfig {
            program_id,
            seller_share_bps,
            rent_lamports_per_byte,
        } = ProgramConfig::from_str(&config_str).unwrap();

        assert_eq!(program_id, ProgramId::from_bytes([3; 32]));
        assert_eq!(seller_share_bps, 9000);
        assert_eq!(rent_lamports_per_byte, 10);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = ProgramConfig::from_str("").unwrap();
        assert_eq!(config, ProgramConfig::default());
    }

    #[test]
    fn oversized_seller_share_is_rejected() {
        let result = ProgramConfig::from_str("seller_share_bps = 10001");
        assert!(matches!(
            result,
            Err(SettlementError::InvalidSellerShare(10001))
        ));
    }
}
