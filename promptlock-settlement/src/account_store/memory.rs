use super::AccountStore;
use promptlock::types::{
    identity::{AccountAddress, WalletAddress},
    ledger::AccountData,
};
use std::collections::{hash_map::Entry, HashMap};

/// [`AccountStore`] backed by hashmaps. Holds the whole ledger state in
/// memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryAccountStore {
    accounts: HashMap<AccountAddress, AccountData>,
    balances: HashMap<WalletAddress, u64>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for MemoryAccountStore {
    fn get(&self, address: &AccountAddress) -> Option<AccountData> {
        self.accounts.get(address).cloned()
    }

    fn create_if_absent(&mut self, address: AccountAddress, data: AccountData) -> bool {
        match self.accounts.entry(address) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                let _ = entry.insert(data);
                true
            }
        }
    }

    fn update(&mut self, address: &AccountAddress, data: AccountData) -> bool {
        match self.accounts.get_mut(address) {
            Some(existing) => {
                *existing = data;
                true
            }
            None => false,
        }
    }

    fn balance(&self, wallet: &WalletAddress) -> u64 {
        self.balances.get(wallet).copied().unwrap_or_default()
    }

    fn set_balance(&mut self, wallet: WalletAddress, lamports: u64) {
        let _ = self.balances.insert(wallet, lamports);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlock::{
        services::ledger::ProgramError,
        types::{
            content::{ContentId, StoragePointer},
            ledger::{Listing, Receipt},
        },
    };

    fn listing(price: u64) -> AccountData {
        AccountData::Listing(Listing {
            content_id: ContentId::new("course_1").unwrap(),
            seller: WalletAddress::from_bytes([1; 32]),
            price,
            storage_pointer: StoragePointer::new("ptr"),
            title: "Course".to_string(),
            purchase_count: 0,
            rent_deposit: 0,
            listed_at_slot: 1,
        })
    }

    #[test]
    fn create_if_absent_never_overwrites() {
        let mut store = MemoryAccountStore::new();
        let address = AccountAddress::from_bytes([9; 32]);

        assert!(store.create_if_absent(address, listing(10)));
        assert!(!store.create_if_absent(address, listing(20)));
        assert_eq!(store.get(&address), Some(listing(10)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_requires_existing_record() {
        let mut store = MemoryAccountStore::new();
        let address = AccountAddress::from_bytes([9; 32]);

        assert!(!store.update(&address, listing(10)));
        assert!(store.is_empty());

        assert!(store.create_if_absent(address, listing(10)));
        assert!(store.update(&address, listing(20)));
        assert_eq!(store.get(&address), Some(listing(20)));
    }

    #[test]
    fn purchase_count_increments() -> Result<(), ProgramError> {
        let mut store = MemoryAccountStore::new();
        let address = AccountAddress::from_bytes([9; 32]);
        assert!(store.create_if_absent(address, listing(10)));

        assert_eq!(store.increment_purchase_count(&address)?, 1);
        assert_eq!(store.increment_purchase_count(&address)?, 2);
        assert_eq!(store.get_listing(&address)?.unwrap().purchase_count, 2);
        Ok(())
    }

    #[test]
    fn listing_reads_reject_other_records() {
        let mut store = MemoryAccountStore::new();
        let address = AccountAddress::from_bytes([9; 32]);
        let receipt = AccountData::Receipt(Receipt {
            buyer: WalletAddress::from_bytes([2; 32]),
            content_id: ContentId::new("course_1").unwrap(),
            price_paid: 10,
            seller_share: 9,
            treasury_share: 1,
            purchased_at_slot: 2,
        });
        assert!(store.create_if_absent(address, receipt));

        assert_eq!(
            store.get_listing(&address),
            Err(ProgramError::CorruptAccount(address))
        );
        assert_eq!(
            store.increment_purchase_count(&address),
            Err(ProgramError::CorruptAccount(address))
        );
    }

    #[test]
    fn transfers_move_exact_amounts() -> Result<(), ProgramError> {
        let mut store = MemoryAccountStore::new();
        let alice = WalletAddress::from_bytes([1; 32]);
        let bob = WalletAddress::from_bytes([2; 32]);
        store.set_balance(alice, 100);

        store.transfer(&alice, &bob, 60)?;
        assert_eq!(store.balance(&alice), 40);
        assert_eq!(store.balance(&bob), 60);

        assert_eq!(
            store.transfer(&alice, &bob, 41),
            Err(ProgramError::InsufficientFunds {
                required: 41,
                available: 40
            })
        );
        assert_eq!(store.balance(&alice), 40);

        // Self transfers are a no-op.
        store.transfer(&bob, &bob, 60)?;
        assert_eq!(store.balance(&bob), 60);
        Ok(())
    }
}
