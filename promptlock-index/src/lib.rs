//! Off-chain read model of the PromptLock marketplace.
//!
//! The [`Indexer`] follows the ledger's confirmed event log and maintains a
//! course catalog and per-wallet libraries in an [`IndexStore`]. The index is
//! never authoritative: access decisions always read the ledger.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod indexer;
pub mod store;

pub use error::IndexError;
pub use indexer::Indexer;
pub use store::{CourseRecord, IndexStore, LibraryEntry};
