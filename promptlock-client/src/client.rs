//! Client object to interact with the marketplace services.

use crate::{config::Config, retry::with_retry, Result};
use promptlock::services::{
    access_control::AccessControlService, ledger::LedgerRpc, storage::DurableStorage,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{future::Future, sync::Arc};
use tokio::sync::Mutex;

/// A `MarketClient` wraps the three services a marketplace participant talks
/// to. It keeps no per-user state and can be shared between sellers and
/// buyers.
pub struct MarketClient {
    config: Config,
    pub(crate) ledger: Arc<dyn LedgerRpc>,
    pub(crate) storage: Arc<dyn DurableStorage>,
    pub(crate) access: Arc<dyn AccessControlService>,
    pub(crate) rng: Arc<Mutex<StdRng>>,
}

impl MarketClient {
    pub fn new(
        config: Config,
        ledger: Arc<dyn LedgerRpc>,
        storage: Arc<dyn DurableStorage>,
        access: Arc<dyn AccessControlService>,
    ) -> Self {
        Self {
            config,
            ledger,
            storage,
            access,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Make one external call under the configured timeout and retry policy.
    pub(crate) async fn call<T, E, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<crate::MarketClientError>,
    {
        with_retry(
            operation,
            self.config.request_timeout,
            &self.config.retry,
            call,
        )
        .await
    }
}
