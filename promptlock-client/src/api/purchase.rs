use crate::{MarketClient, MarketClientError, Result};
use promptlock::{
    constants::PLATFORM_TREASURY,
    crypto::receipt_address,
    services::{
        ledger::{LedgerError, ProgramError},
        wallet::Wallet,
    },
    types::{
        content::ContentId,
        transaction::{Instruction, SignedTransaction, TransactionReceipt},
    },
};
use tracing::{info, warn};

impl MarketClient {
    pub(crate) async fn handle_buy_content(
        &self,
        content_id: ContentId,
        wallet: &dyn Wallet,
    ) -> Result<TransactionReceipt> {
        let instruction = Instruction::BuyContent {
            content_id: content_id.clone(),
            treasury: PLATFORM_TREASURY,
        };
        let transaction =
            SignedTransaction::sign(wallet, &self.config().program_id, instruction).await?;

        match self.submit_signed(&transaction).await {
            // An earlier attempt may have been confirmed with its response lost.
            (Err(error), attempts) if attempts > 1 && is_already_purchased(&error) => {
                warn!(
                    "Purchase of {} rejected as a duplicate on attempt {}. Checking for an earlier confirmation.",
                    content_id, attempts
                );
                match self.find_confirmed_purchase(&transaction, &content_id).await? {
                    Some(receipt) => {
                        info!("Earlier attempt was confirmed in slot {}", receipt.slot);
                        Ok(receipt)
                    }
                    None => Err(error),
                }
            }
            (result, _) => result,
        }
    }

    /// Look up the confirmation of `transaction`, if the ledger holds a
    /// receipt that this exact transaction created.
    async fn find_confirmed_purchase(
        &self,
        transaction: &SignedTransaction,
        content_id: &ContentId,
    ) -> Result<Option<TransactionReceipt>> {
        let address = receipt_address(&self.config().program_id, &transaction.signer, content_id);
        let account = self
            .call("get_account", || self.ledger.get_account(&address))
            .await?;
        let slot = match account.as_ref().and_then(|data| data.as_receipt()) {
            Some(receipt) => receipt.purchased_at_slot,
            None => return Ok(None),
        };

        let signature = transaction.confirmed_signature(slot);
        let events = self
            .call("events_since", || {
                self.ledger.events_since(slot.saturating_sub(1))
            })
            .await?;
        Ok(events
            .into_iter()
            .find(|event| event.slot == slot && event.signature == signature)
            .map(|event| TransactionReceipt {
                signature: event.signature,
                slot: event.slot,
                event: event.event,
            }))
    }
}

fn is_already_purchased(error: &MarketClientError) -> bool {
    matches!(
        error,
        MarketClientError::Ledger(LedgerError::Program(ProgramError::AlreadyPurchased { .. }))
    )
}
