use super::AccountStore;
use promptlock::types::{
    identity::{AccountAddress, WalletAddress},
    ledger::AccountData,
};
use std::collections::HashMap;

/// Buffers writes on top of another [`AccountStore`].
///
/// Reads see the buffered writes first. Nothing reaches the underlying store
/// until [`StagedTransaction::commit`]; dropping the transaction discards
/// every change.
pub struct StagedTransaction<'a, S: AccountStore> {
    base: &'a mut S,
    accounts: HashMap<AccountAddress, AccountData>,
    balances: HashMap<WalletAddress, u64>,
}

impl<'a, S: AccountStore> StagedTransaction<'a, S> {
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            accounts: HashMap::new(),
            balances: HashMap::new(),
        }
    }

    /// Apply every buffered write to the underlying store.
    pub fn commit(self) {
        let Self {
            base,
            accounts,
            balances,
        } = self;

        for (address, data) in accounts {
            if !base.create_if_absent(address, data.clone()) {
                let _ = base.update(&address, data);
            }
        }
        for (wallet, lamports) in balances {
            base.set_balance(wallet, lamports);
        }
    }
}

impl<'a, S: AccountStore> AccountStore for StagedTransaction<'a, S> {
    fn get(&self, address: &AccountAddress) -> Option<AccountData> {
        self.accounts
            .get(address)
            .cloned()
            .or_else(|| self.base.get(address))
    }

    fn create_if_absent(&mut self, address: AccountAddress, data: AccountData) -> bool {
        if self.get(&address).is_some() {
            return false;
        }
        let _ = self.accounts.insert(address, data);
        true
    }

    fn update(&mut self, address: &AccountAddress, data: AccountData) -> bool {
        if self.get(address).is_none() {
            return false;
        }
        let _ = self.accounts.insert(*address, data);
        true
    }

    fn balance(&self, wallet: &WalletAddress) -> u64 {
        self.balances
            .get(wallet)
            .copied()
            .unwrap_or_else(|| self.base.balance(wallet))
    }

    fn set_balance(&mut self, wallet: WalletAddress, lamports: u64) {
        let _ = self.balances.insert(wallet, lamports);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryAccountStore;
    use promptlock::types::{content::ContentId, ledger::Receipt};

    fn receipt(buyer: u8) -> AccountData {
        AccountData::Receipt(Receipt {
            buyer: WalletAddress::from_bytes([buyer; 32]),
            content_id: ContentId::new("course_1").unwrap(),
            price_paid: 10,
            seller_share: 9,
            treasury_share: 1,
            purchased_at_slot: 2,
        })
    }

    #[test]
    fn dropped_transaction_changes_nothing() {
        let mut store = MemoryAccountStore::new();
        let wallet = WalletAddress::from_bytes([1; 32]);
        store.set_balance(wallet, 100);

        {
            let mut staged = StagedTransaction::new(&mut store);
            staged.set_balance(wallet, 5);
            assert!(staged.create_if_absent(AccountAddress::from_bytes([7; 32]), receipt(1)));
            assert_eq!(staged.balance(&wallet), 5);
        }

        assert_eq!(store.balance(&wallet), 100);
        assert!(store.is_empty());
    }

    #[test]
    fn committed_transaction_applies_everything() {
        let mut store = MemoryAccountStore::new();
        let wallet = WalletAddress::from_bytes([1; 32]);
        let created = AccountAddress::from_bytes([7; 32]);
        let updated = AccountAddress::from_bytes([8; 32]);
        assert!(store.create_if_absent(updated, receipt(1)));

        let mut staged = StagedTransaction::new(&mut store);
        staged.set_balance(wallet, 5);
        assert!(staged.create_if_absent(created, receipt(2)));
        assert!(staged.update(&updated, receipt(3)));
        staged.commit();

        assert_eq!(store.balance(&wallet), 5);
        assert_eq!(store.get(&created), Some(receipt(2)));
        assert_eq!(store.get(&updated), Some(receipt(3)));
    }

    #[test]
    fn staged_reads_see_base_and_occupied_slots() {
        let mut store = MemoryAccountStore::new();
        let address = AccountAddress::from_bytes([7; 32]);
        assert!(store.create_if_absent(address, receipt(1)));

        let mut staged = StagedTransaction::new(&mut store);
        assert_eq!(staged.get(&address), Some(receipt(1)));
        assert!(!staged.create_if_absent(address, receipt(2)));

        let fresh = AccountAddress::from_bytes([9; 32]);
        assert!(staged.create_if_absent(fresh, receipt(2)));
        assert!(!staged.create_if_absent(fresh, receipt(3)));
    }
}
