use crate::{
    types::{content::ContentId, identity::ProgramId},
    PromptLockError,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// A predicate over ledger state that the access-control service evaluates,
/// against the requesting wallet, before releasing a locked secret.
///
/// The encoding from [`AccessCondition::canonical_bytes`] is bound into the
/// locked ciphertext, so the condition submitted at unlock must be the one the
/// secret was locked under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessCondition {
    /// The requester holds a purchase receipt for `content_id` issued by
    /// `program_id`.
    ReceiptExists {
        program_id: ProgramId,
        content_id: ContentId,
    },
    /// The requester's native balance is at least `lamports`. Says nothing
    /// about ownership; `MinimumBalance { lamports: 0 }` admits every wallet.
    MinimumBalance { lamports: u64 },
}

impl AccessCondition {
    pub fn receipt_exists(program_id: ProgramId, content_id: ContentId) -> Self {
        AccessCondition::ReceiptExists {
            program_id,
            content_id,
        }
    }

    pub fn canonical_bytes(&self) -> Result<Vec<u8>, PromptLockError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn digest(&self) -> Result<[u8; 32], PromptLockError> {
        Ok(Sha3_256::digest(self.canonical_bytes()?).into())
    }
}
