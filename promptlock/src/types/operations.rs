//! Requests and responses of the access-control service.

use crate::{
    infrastructure::encoding::base64_bytes,
    types::{
        auth::AuthProof,
        bundle::{LockHash, LockedSecret},
        condition::AccessCondition,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use strum::{Display, EnumIter, EnumString};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Actions the access-control service performs.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter, EnumString,
)]
pub enum ServiceAction {
    Lock,
    Unlock,
}

/// Raw secret bytes handed to or released by the access-control service.
/// Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretMaterial(#[serde(with = "base64_bytes")] Vec<u8>);

impl SecretMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for SecretMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretMaterial(REDACTED, {} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRequest {
    pub secret: SecretMaterial,
    pub condition: AccessCondition,
    pub auth_proof: AuthProof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockResponse {
    pub locked_secret: LockedSecret,
    pub lock_hash: LockHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRequest {
    pub locked_secret: LockedSecret,
    pub lock_hash: LockHash,
    pub condition: AccessCondition,
    pub auth_proof: AuthProof,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub secret: SecretMaterial,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn secret_material_is_redacted() {
        let secret = SecretMaterial::new(vec![0xAB; 32]);
        let printed = format!("{secret:?}");
        assert!(!printed.contains("171"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn service_actions_round_trip_through_strings() {
        for action in ServiceAction::iter() {
            assert_eq!(ServiceAction::from_str(&action.to_string()).unwrap(), action);
        }
    }
}
