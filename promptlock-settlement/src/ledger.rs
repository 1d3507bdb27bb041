//! An in-process ledger hosting the settlement program.
//!
//! Transactions are serialized through a single lock. Each one runs inside a
//! [`StagedTransaction`] that is committed only if the program succeeds, so
//! concurrent submissions observe either all of a transaction's effects or
//! none of them.

use crate::{AccountStore, MemoryAccountStore, ProgramConfig, SettlementProgram, StagedTransaction};
use async_trait::async_trait;
use promptlock::{
    services::ledger::{LedgerError, LedgerRpc, ProgramError},
    types::{
        identity::{AccountAddress, ProgramId, WalletAddress},
        ledger::AccountData,
        transaction::{LedgerEvent, SignedTransaction, TransactionReceipt},
    },
};
use tokio::sync::Mutex;
use tracing::{info, instrument};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: MemoryAccountStore,
    slot: u64,
    events: Vec<LedgerEvent>,
}

#[derive(Debug)]
pub struct Ledger {
    program: SettlementProgram,
    state: Mutex<LedgerState>,
}

impl Ledger {
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            program: SettlementProgram::new(config),
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn program_id(&self) -> &ProgramId {
        self.program.program_id()
    }

    pub fn program(&self) -> &SettlementProgram {
        &self.program
    }

    /// Credit `wallet` with freshly minted lamports. For development and
    /// tests only.
    #[instrument(skip(self))]
    pub async fn airdrop(&self, wallet: &WalletAddress, lamports: u64) -> Result<u64, LedgerError> {
        let mut state = self.state.lock().await;
        let balance = state
            .accounts
            .balance(wallet)
            .checked_add(lamports)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        state.accounts.set_balance(*wallet, balance);
        Ok(balance)
    }

    /// Most recently confirmed slot.
    pub async fn slot(&self) -> u64 {
        self.state.lock().await.slot
    }
}

#[async_trait]
impl LedgerRpc for Ledger {
    #[instrument(skip_all, err(Debug), fields(signer = %transaction.signer, instruction = transaction.instruction.name()))]
    async fn submit_transaction(
        &self,
        transaction: SignedTransaction,
    ) -> Result<TransactionReceipt, LedgerError> {
        transaction
            .verify(self.program_id())
            .map_err(|_| ProgramError::InvalidSignature)?;

        let mut state = self.state.lock().await;
        let slot = state.slot + 1;

        let mut staged = StagedTransaction::new(&mut state.accounts);
        let event =
            self.program
                .process(&mut staged, transaction.signer, &transaction.instruction, slot)?;
        staged.commit();

        let signature = transaction.confirmed_signature(slot);
        state.slot = slot;
        state.events.push(LedgerEvent {
            slot,
            signature: signature.clone(),
            event: event.clone(),
        });

        info!("Confirmed {} in slot {}", signature, slot);
        Ok(TransactionReceipt {
            signature,
            slot,
            event,
        })
    }

    async fn get_account(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<AccountData>, LedgerError> {
        Ok(self.state.lock().await.accounts.get(address))
    }

    async fn balance(&self, wallet: &WalletAddress) -> Result<u64, LedgerError> {
        Ok(self.state.lock().await.accounts.balance(wallet))
    }

    async fn events_since(&self, slot: u64) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self
            .state
            .lock()
            .await
            .events
            .iter()
            .filter(|event| event.slot > slot)
            .cloned()
            .collect())
    }
}
