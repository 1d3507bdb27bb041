//! Cryptography, ledger records, and service interfaces shared by the
//! entities of the PromptLock content marketplace.
//!
//! ⚠️ __Usage__: This crate is designed as a dependency for the other crates in
//! the workspace, including `promptlock-settlement`,
//! `promptlock-access-server` and `promptlock-client`.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod types;

pub use error::{ErrorCategory, PromptLockError};
