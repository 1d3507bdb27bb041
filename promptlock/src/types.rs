//! Records, messages and identifiers shared by the settlement program, the
//! access-control server and the client.

pub mod audit_event;
pub mod auth;
pub mod bundle;
pub mod condition;
pub mod content;
pub mod identity;
pub mod ledger;
pub mod operations;
pub mod transaction;
