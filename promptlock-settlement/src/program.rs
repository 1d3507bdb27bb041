//! The settlement program's instruction handlers.
//!
//! Handlers run against any [`AccountStore`]. They return an error before
//! any write whenever a precondition fails, but may fail part way through a
//! purchase; callers must run them inside a [`StagedTransaction`] and only
//! commit on success.
//!
//! [`StagedTransaction`]: crate::StagedTransaction

mod buy_content;
mod fees;
mod list_content;

pub use fees::{split_payment, PaymentSplit};

use crate::{AccountStore, ProgramConfig};
use promptlock::{
    services::ledger::ProgramError,
    types::{
        identity::{ProgramId, WalletAddress},
        transaction::{Instruction, MarketEvent},
    },
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SettlementProgram {
    config: ProgramConfig,
}

impl SettlementProgram {
    pub fn new(config: ProgramConfig) -> Self {
        Self { config }
    }

    pub fn program_id(&self) -> &ProgramId {
        &self.config.program_id
    }

    pub fn treasury(&self) -> WalletAddress {
        self.config.treasury()
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// Dispatch `instruction`, signed by `signer`, in ledger slot `slot`.
    pub fn process(
        &self,
        store: &mut impl AccountStore,
        signer: WalletAddress,
        instruction: &Instruction,
        slot: u64,
    ) -> Result<MarketEvent, ProgramError> {
        info!("Processing {} from {}", instruction.name(), signer);

        match instruction {
            Instruction::ListContent {
                content_id,
                storage_pointer,
                title,
                price,
            } => self.list_content(store, signer, content_id, storage_pointer, title, *price, slot),
            Instruction::BuyContent {
                content_id,
                treasury,
            } => self.buy_content(store, signer, content_id, treasury, slot),
        }
    }
}
