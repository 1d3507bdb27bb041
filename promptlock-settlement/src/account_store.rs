//! Storage capability the settlement program runs against.

pub mod memory;
pub mod transaction;

use promptlock::{
    services::ledger::ProgramError,
    types::{
        identity::{AccountAddress, WalletAddress},
        ledger::{AccountData, Listing},
    },
};

/// Program-owned records and native balances.
///
/// Records are created with [`AccountStore::create_if_absent`] and can never
/// be deleted. A missing balance reads as zero.
pub trait AccountStore {
    fn get(&self, address: &AccountAddress) -> Option<AccountData>;

    /// Store `data` at `address` unless the slot is occupied. Returns whether
    /// the record was created.
    fn create_if_absent(&mut self, address: AccountAddress, data: AccountData) -> bool;

    /// Replace an existing record. Returns `false` if nothing is stored at
    /// `address`.
    fn update(&mut self, address: &AccountAddress, data: AccountData) -> bool;

    fn balance(&self, wallet: &WalletAddress) -> u64;

    fn set_balance(&mut self, wallet: WalletAddress, lamports: u64);

    fn get_listing(&self, address: &AccountAddress) -> Result<Option<Listing>, ProgramError> {
        match self.get(address) {
            None => Ok(None),
            Some(AccountData::Listing(listing)) => Ok(Some(listing)),
            Some(_) => Err(ProgramError::CorruptAccount(*address)),
        }
    }

    /// Bump the purchase counter of the listing at `address` and return the
    /// new value.
    fn increment_purchase_count(&mut self, address: &AccountAddress) -> Result<u64, ProgramError> {
        let mut listing = self
            .get_listing(address)?
            .ok_or(ProgramError::CorruptAccount(*address))?;
        listing.purchase_count = listing
            .purchase_count
            .checked_add(1)
            .ok_or(ProgramError::ArithmeticOverflow)?;

        let count = listing.purchase_count;
        if !self.update(address, AccountData::Listing(listing)) {
            return Err(ProgramError::CorruptAccount(*address));
        }
        Ok(count)
    }

    /// Move `lamports` from one balance to another.
    fn transfer(
        &mut self,
        from: &WalletAddress,
        to: &WalletAddress,
        lamports: u64,
    ) -> Result<(), ProgramError> {
        let available = self.balance(from);
        let remaining = available
            .checked_sub(lamports)
            .ok_or(ProgramError::InsufficientFunds {
                required: lamports,
                available,
            })?;
        self.set_balance(*from, remaining);

        let credited = self
            .balance(to)
            .checked_add(lamports)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        self.set_balance(*to, credited);
        Ok(())
    }
}
