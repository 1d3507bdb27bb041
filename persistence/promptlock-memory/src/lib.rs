//! In-memory backends for PromptLock: durable object storage, the access
//! server's audit log, and the marketplace index.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod audit;
pub mod config;
pub mod index;
pub mod storage;

pub use audit::MemoryAuditStore;
pub use config::{Config, Error};
pub use index::MemoryIndexStore;
pub use storage::MemoryStorage;
