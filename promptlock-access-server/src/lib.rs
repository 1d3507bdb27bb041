//! The PromptLock access-control service.
//!
//! Locks content keys under an [`AccessCondition`] and releases them only to
//! wallets that satisfy that condition on the ledger at the time of the
//! request.
//!
//! [`AccessCondition`]: promptlock::types::condition::AccessCondition
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod condition;
pub mod config;
pub mod error;
pub mod operations;
pub mod server;

pub use config::Config;
pub use error::AccessServerError;
pub use server::{database::DataStore, AccessServer};
