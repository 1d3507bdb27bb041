//! Audit events recorded by the access-control service.

use crate::types::{bundle::LockHash, identity::WalletAddress, operations::ServiceAction};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::Display;
use time::OffsetDateTime;
use uuid::Uuid;

/// Options for the outcome of a given action in an [`AuditEvent`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum EventStatus {
    Started,
    Successful,
    Failed,
}

/// A single entry that specifies the actor, action, outcome, and the lock
/// concerned, if known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    request_id: Uuid,
    actor: WalletAddress,
    lock_hash: Option<LockHash>,
    date: OffsetDateTime,
    action: ServiceAction,
    status: EventStatus,
}

impl AuditEvent {
    pub fn new(
        request_id: Uuid,
        actor: WalletAddress,
        lock_hash: Option<LockHash>,
        action: ServiceAction,
        status: EventStatus,
    ) -> Self {
        AuditEvent {
            request_id,
            actor,
            lock_hash,
            date: OffsetDateTime::now_utc(),
            action,
            status,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn actor(&self) -> &WalletAddress {
        &self.actor
    }

    pub fn lock_hash(&self) -> Option<&LockHash> {
        self.lock_hash.as_ref()
    }

    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    pub fn action(&self) -> ServiceAction {
        self.action
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }
}

impl Display for AuditEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Request ID: {}", self.request_id)?;
        writeln!(f, "Actor: {}", self.actor)?;
        if let Some(lock_hash) = &self.lock_hash {
            writeln!(f, "Lock: {lock_hash}")?;
        }
        writeln!(f, "{}", self.date)?;
        writeln!(f, "{}", self.action)?;
        writeln!(f, "{}", self.status)
    }
}
