//! The settlement program's wire contract: instructions, signed transactions,
//! and the events a confirmed transaction emits.

use crate::{
    crypto::{verify_wallet_signature, wallet_address},
    services::wallet::Wallet,
    types::{
        content::{ContentId, StoragePointer},
        identity::{ProgramId, WalletAddress},
    },
    PromptLockError,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt::{Display, Formatter};
use strum::IntoStaticStr;

/// Entrypoints of the settlement program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
pub enum Instruction {
    ListContent {
        content_id: ContentId,
        storage_pointer: StoragePointer,
        title: String,
        price: u64,
    },
    BuyContent {
        content_id: ContentId,
        treasury: WalletAddress,
    },
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// An [`Instruction`] signed by the wallet that pays for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub signer: WalletAddress,
    /// SEC1-compressed secp256k1 verifying key of `signer`.
    pub verifying_key: Vec<u8>,
    pub instruction: Instruction,
    /// Distinguishes otherwise identical submissions.
    pub nonce: [u8; 16],
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    const DOMAIN_SEPARATOR: &'static [u8] = b"PromptLock settlement transaction";

    /// Bytes covered by the signature. Binding the program id means a
    /// transaction can't be replayed against a different deployment.
    pub fn message(
        program_id: &ProgramId,
        instruction: &Instruction,
        nonce: &[u8; 16],
    ) -> Result<Vec<u8>, PromptLockError> {
        let mut message = Self::DOMAIN_SEPARATOR.to_vec();
        message.extend_from_slice(program_id.as_bytes());
        message.extend_from_slice(nonce);
        message.extend(bincode::serialize(instruction)?);
        Ok(message)
    }

    pub async fn sign(
        wallet: &dyn Wallet,
        program_id: &ProgramId,
        instruction: Instruction,
    ) -> Result<Self, PromptLockError> {
        let nonce: [u8; 16] = rand::random();
        let message = Self::message(program_id, &instruction, &nonce)?;
        let signature = wallet.sign_message(&message).await?;

        Ok(Self {
            signer: wallet.address(),
            verifying_key: wallet.verifying_key(),
            instruction,
            nonce,
            signature,
        })
    }

    /// Check that `signer` owns `verifying_key` and signed this instruction
    /// for `program_id`.
    pub fn verify(&self, program_id: &ProgramId) -> Result<(), PromptLockError> {
        if wallet_address(&self.verifying_key)? != self.signer {
            return Err(PromptLockError::InvalidTransactionSignature);
        }
        let message = Self::message(program_id, &self.instruction, &self.nonce)?;
        verify_wallet_signature(&self.verifying_key, &message, &self.signature)
            .map_err(|_| PromptLockError::InvalidTransactionSignature)
    }

    /// Identifier of this transaction once confirmed in `slot`.
    pub fn confirmed_signature(&self, slot: u64) -> TxSignature {
        let digest = Sha3_256::new()
            .chain_update(slot.to_be_bytes())
            .chain_update(self.signer.as_bytes())
            .chain_update(&self.signature)
            .finalize();
        TxSignature(bs58::encode(digest).into_string())
    }
}

/// Base58 identifier of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxSignature(pub String);

impl Display for TxSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Facts emitted by the settlement program for off-chain consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    ContentListed {
        content_id: ContentId,
        seller: WalletAddress,
        price: u64,
        storage_pointer: StoragePointer,
        title: String,
    },
    ContentPurchased {
        content_id: ContentId,
        buyer: WalletAddress,
        seller: WalletAddress,
        price: u64,
        seller_share: u64,
        treasury_share: u64,
    },
}

impl MarketEvent {
    pub fn content_id(&self) -> &ContentId {
        match self {
            MarketEvent::ContentListed { content_id, .. }
            | MarketEvent::ContentPurchased { content_id, .. } => content_id,
        }
    }
}

/// A [`MarketEvent`] as recorded in the ledger's confirmed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub slot: u64,
    pub signature: TxSignature,
    pub event: MarketEvent,
}

/// What the ledger returns for a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub signature: TxSignature,
    pub slot: u64,
    pub event: MarketEvent,
}
