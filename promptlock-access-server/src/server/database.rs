//! Storage for the access-control service.
//!
//! The service keeps no secrets at rest; it only records who asked for what.

use async_trait::async_trait;
use promptlock::types::{
    audit_event::{AuditEvent, EventStatus},
    bundle::LockHash,
    identity::WalletAddress,
    operations::ServiceAction,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("No such entry in table.")]
    NoEntry,
    #[error("An error occurred within the database: {0}. See database logs.")]
    InternalDatabaseError(String),
}

/// Defines the expected interface between the access-control service and its
/// database.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    /// Create a new [`AuditEvent`] for the given actor, action, and outcome.
    async fn create_audit_event(
        &self,
        request_id: Uuid,
        actor: &WalletAddress,
        lock_hash: &Option<LockHash>,
        action: ServiceAction,
        status: EventStatus,
    ) -> Result<(), DatabaseError>;

    /// Find every [`AuditEvent`] recorded for `actor`, oldest first.
    async fn find_audit_events(
        &self,
        actor: &WalletAddress,
        action: Option<ServiceAction>,
    ) -> Result<Vec<AuditEvent>, DatabaseError>;
}
