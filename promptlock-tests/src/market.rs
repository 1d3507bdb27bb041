//! A complete marketplace wired together in memory.

use crate::{config::Config, error::Result, utils::random_bytes};
use promptlock::{
    crypto::WalletKeyPair, services::wallet::Wallet, types::identity::ProgramId,
};
use promptlock_access_server::{AccessServer, Config as AccessServerConfig};
use promptlock_client::MarketClient;
use promptlock_index::Indexer;
use promptlock_memory::{MemoryAuditStore, MemoryIndexStore, MemoryStorage};
use promptlock_settlement::Ledger;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;

/// Each test case builds its own market so cases can run in parallel
/// without sharing ledger state.
pub struct TestMarket {
    pub client: MarketClient,
    pub ledger: Arc<Ledger>,
    pub storage: Arc<MemoryStorage>,
    pub audit: Arc<MemoryAuditStore>,
    pub indexer: Indexer<MemoryIndexStore>,
}

impl TestMarket {
    pub fn new(config: &Config) -> Result<Self> {
        let mut rng = StdRng::from_entropy();
        let ledger = Arc::new(Ledger::new(config.program_config.clone()));
        let storage = Arc::new(MemoryStorage::new(config.storage_config.clone()));
        let audit = Arc::new(MemoryAuditStore::new());

        let access_config = AccessServerConfig::from_config_file(
            config.access_server_config.clone(),
            Some(random_bytes(&mut rng, 32)),
        )?;
        let access = AccessServer::new(audit.clone(), ledger.clone(), access_config);

        let client = MarketClient::new(
            config.client_config.clone(),
            ledger.clone(),
            storage.clone(),
            Arc::new(access),
        );
        let indexer = Indexer::new(ledger.clone(), Arc::new(MemoryIndexStore::new()));

        Ok(Self {
            client,
            ledger,
            storage,
            audit,
            indexer,
        })
    }

    pub fn program_id(&self) -> ProgramId {
        *self.ledger.program_id()
    }

    /// A fresh wallet holding `lamports`.
    pub async fn funded_wallet(&self, lamports: u64) -> Result<WalletKeyPair> {
        let wallet = WalletKeyPair::generate(&mut StdRng::from_entropy());
        let _ = self.ledger.airdrop(&wallet.address(), lamports).await?;
        Ok(wallet)
    }
}
