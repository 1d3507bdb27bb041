use crate::{AccountStore, SettlementProgram};
use promptlock::{
    crypto::listing_address,
    services::ledger::ProgramError,
    types::{
        content::{validate_listing_fields, ContentId, StoragePointer},
        identity::WalletAddress,
        ledger::{AccountData, Listing},
        transaction::MarketEvent,
    },
};
use tracing::info;

impl SettlementProgram {
    /// Create the listing for `content_id`, owned by `seller`, and charge
    /// the seller rent for the record.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn list_content(
        &self,
        store: &mut impl AccountStore,
        seller: WalletAddress,
        content_id: &ContentId,
        storage_pointer: &StoragePointer,
        title: &str,
        price: u64,
        slot: u64,
    ) -> Result<MarketEvent, ProgramError> {
        if price == 0 {
            return Err(ProgramError::InvalidPrice);
        }
        validate_listing_fields(storage_pointer, title)
            .map_err(|e| ProgramError::InvalidArgument(e.to_string()))?;

        let address = listing_address(self.program_id(), content_id);
        if store.get(&address).is_some() {
            return Err(ProgramError::ListingAlreadyExists(content_id.clone()));
        }

        let mut listing = Listing {
            content_id: content_id.clone(),
            seller,
            price,
            storage_pointer: storage_pointer.clone(),
            title: title.to_string(),
            purchase_count: 0,
            rent_deposit: 0,
            listed_at_slot: slot,
        };
        listing.rent_deposit = self.rent_for(&listing)?;

        // The deposit stays with the listing; nothing credits another wallet.
        let available = store.balance(&seller);
        let remaining =
            available
                .checked_sub(listing.rent_deposit)
                .ok_or(ProgramError::InsufficientFunds {
                    required: listing.rent_deposit,
                    available,
                })?;
        store.set_balance(seller, remaining);

        let event = MarketEvent::ContentListed {
            content_id: content_id.clone(),
            seller,
            price,
            storage_pointer: storage_pointer.clone(),
            title: title.to_string(),
        };
        let rent = listing.rent_deposit;
        if !store.create_if_absent(address, AccountData::Listing(listing)) {
            return Err(ProgramError::ListingAlreadyExists(content_id.clone()));
        }

        info!("Listed {} at {} lamports, rent {}", content_id, price, rent);
        Ok(event)
    }

    /// Rent owed for storing `listing`, based on its serialized size.
    pub fn rent_for(&self, listing: &Listing) -> Result<u64, ProgramError> {
        let len = AccountData::Listing(listing.clone())
            .serialized_len()
            .map_err(|e| ProgramError::InvalidArgument(e.to_string()))?;
        len.checked_mul(self.config().rent_lamports_per_byte)
            .ok_or(ProgramError::ArithmeticOverflow)
    }
}
