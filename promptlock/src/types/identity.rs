//! Fixed-size ledger identifiers.
//!
//! All of these are 32 bytes and render as base58, the way ledger explorers
//! show them.

use crate::PromptLockError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

macro_rules! ledger_address {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const LEN: usize = 32;

            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_base58(&self) -> String {
                bs58::encode(self.0).into_string()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = PromptLockError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let array: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| PromptLockError::InvalidAddress(hex::encode(bytes)))?;
                Ok(Self(array))
            }
        }

        impl FromStr for $name {
            type Err = PromptLockError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = bs58::decode(s)
                    .into_vec()
                    .map_err(|_| PromptLockError::InvalidAddress(s.to_string()))?;
                Self::try_from(bytes.as_slice())
                    .map_err(|_| PromptLockError::InvalidAddress(s.to_string()))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_base58())
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_base58())
            }
        }
    };
}

ledger_address!(
    /// Identity of a wallet: the SHA3-256 digest of its SEC1-compressed
    /// verifying key. Also used for program-owned balances such as custody.
    WalletAddress
);

ledger_address!(
    /// Identity of a deployed program.
    ProgramId
);

ledger_address!(
    /// Location of a record in ledger account storage.
    AccountAddress
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::{PLATFORM_TREASURY, PROGRAM_ID};

    #[test]
    fn hardcoded_addresses_render_as_deployed() {
        assert_eq!(
            PLATFORM_TREASURY.to_string(),
            "H5DiQKbhnKM2GMtpc953QZJwVCEi5zDawkseH3zGMg86"
        );
        assert_eq!(
            PROGRAM_ID.to_string(),
            "EH7hw6xEUm9seh7Ss3jGERDXh7UeFY4ZA9X1wdLd5hif"
        );
    }

    #[test]
    fn addresses_parse_from_base58() -> Result<(), PromptLockError> {
        let parsed = WalletAddress::from_str("H5DiQKbhnKM2GMtpc953QZJwVCEi5zDawkseH3zGMg86")?;
        assert_eq!(parsed, PLATFORM_TREASURY);
        Ok(())
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        // '0' is not in the base58 alphabet
        assert!(WalletAddress::from_str("0OIl").is_err());
        // Valid base58 but too short
        assert!(WalletAddress::from_str("abc").is_err());
        assert!(AccountAddress::try_from([1u8; 31].as_slice()).is_err());
    }
}
