use crate::{program::split_payment, AccountStore, SettlementProgram};
use promptlock::{
    crypto::{custody_address, listing_address, receipt_address},
    services::ledger::ProgramError,
    types::{
        content::ContentId,
        identity::WalletAddress,
        ledger::{AccountData, Receipt},
        transaction::MarketEvent,
    },
};
use tracing::info;

impl SettlementProgram {
    /// Execute a purchase of `content_id` by `buyer`.
    ///
    /// Preconditions are checked in order: the listing exists, `treasury` is
    /// the platform treasury, and `buyer` holds no receipt yet. The price
    /// passes through the custody account, which ends at its prior balance.
    pub(super) fn buy_content(
        &self,
        store: &mut impl AccountStore,
        buyer: WalletAddress,
        content_id: &ContentId,
        treasury: &WalletAddress,
        slot: u64,
    ) -> Result<MarketEvent, ProgramError> {
        let listing_address = listing_address(self.program_id(), content_id);
        let listing = store
            .get_listing(&listing_address)?
            .ok_or_else(|| ProgramError::ListingNotFound(content_id.clone()))?;

        let expected = self.treasury();
        if treasury != &expected {
            return Err(ProgramError::TreasuryMismatch {
                expected,
                provided: *treasury,
            });
        }

        let receipt_address = receipt_address(self.program_id(), &buyer, content_id);
        if store.get(&receipt_address).is_some() {
            return Err(ProgramError::AlreadyPurchased {
                buyer,
                content_id: content_id.clone(),
            });
        }

        let split = split_payment(listing.price, self.config().seller_share_bps)?;
        let custody = custody_address(self.program_id());
        store.transfer(&buyer, &custody, listing.price)?;
        store.transfer(&custody, &listing.seller, split.seller_share)?;
        store.transfer(&custody, &expected, split.treasury_share)?;

        let receipt = Receipt {
            buyer,
            content_id: content_id.clone(),
            price_paid: listing.price,
            seller_share: split.seller_share,
            treasury_share: split.treasury_share,
            purchased_at_slot: slot,
        };
        if !store.create_if_absent(receipt_address, AccountData::Receipt(receipt)) {
            return Err(ProgramError::AlreadyPurchased {
                buyer,
                content_id: content_id.clone(),
            });
        }
        let purchase_count = store.increment_purchase_count(&listing_address)?;

        info!(
            "{} bought {} (purchase #{}), seller share {}, treasury share {}",
            buyer, content_id, purchase_count, split.seller_share, split.treasury_share
        );
        Ok(MarketEvent::ContentPurchased {
            content_id: content_id.clone(),
            buyer,
            seller: listing.seller,
            price: listing.price,
            seller_share: split.seller_share,
            treasury_share: split.treasury_share,
        })
    }
}
