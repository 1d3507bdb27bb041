use crate::{server::database::DataStore, AccessServerError, Config};
use promptlock::{
    services::ledger::LedgerRpc,
    types::{
        audit_event::EventStatus, bundle::LockHash, identity::WalletAddress,
        operations::ServiceAction,
    },
};
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

pub(crate) struct Context<DB: DataStore> {
    pub db: Arc<DB>,
    pub config: Arc<Config>,
    pub ledger: Arc<dyn LedgerRpc>,
    pub rng: Arc<Mutex<StdRng>>,
    pub request_id: Uuid,
    /// Set once the operation learns which lock it is working on.
    pub lock_hash: Option<LockHash>,
}

impl<DB: DataStore> Context<DB> {
    #[instrument(skip(self))]
    pub(crate) async fn create_audit_event(
        &self,
        actor: &WalletAddress,
        action: ServiceAction,
        status: EventStatus,
    ) -> Result<(), AccessServerError> {
        Ok(self
            .db
            .create_audit_event(self.request_id, actor, &self.lock_hash, action, status)
            .await?)
    }
}
