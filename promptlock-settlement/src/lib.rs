//! The PromptLock settlement program and an in-process ledger that runs it.
//!
//! The program is a deterministic state machine over an [`AccountStore`]. It
//! creates listings, executes purchases, splits each payment between the
//! seller and the platform treasury, and issues one permanent receipt per
//! buyer and content id. The [`Ledger`] executes each signed transaction
//! against a [`StagedTransaction`] so that a failing instruction leaves no
//! trace.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod account_store;
pub mod config;
pub mod error;
pub mod ledger;
pub mod program;

pub use account_store::{memory::MemoryAccountStore, transaction::StagedTransaction, AccountStore};
pub use config::ProgramConfig;
pub use error::SettlementError;
pub use ledger::Ledger;
pub use program::SettlementProgram;
