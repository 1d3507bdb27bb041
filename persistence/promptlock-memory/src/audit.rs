use async_trait::async_trait;
use promptlock::types::{
    audit_event::{AuditEvent, EventStatus},
    bundle::LockHash,
    identity::WalletAddress,
    operations::ServiceAction,
};
use promptlock_access_server::server::database::{DataStore, DatabaseError};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Audit log for the access server, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryAuditStore {
    async fn create_audit_event(
        &self,
        request_id: Uuid,
        actor: &WalletAddress,
        lock_hash: &Option<LockHash>,
        action: ServiceAction,
        status: EventStatus,
    ) -> Result<(), DatabaseError> {
        let event = AuditEvent::new(request_id, *actor, lock_hash.clone(), action, status);
        self.events.write().await.push(event);
        Ok(())
    }

    async fn find_audit_events(
        &self,
        actor: &WalletAddress,
        action: Option<ServiceAction>,
    ) -> Result<Vec<AuditEvent>, DatabaseError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.actor() == actor)
            .filter(|event| action.map_or(true, |action| event.action() == action))
            .cloned()
            .collect())
    }
}
