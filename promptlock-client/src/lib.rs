//! Client library for the PromptLock marketplace.
//!
//! Sellers encrypt and publish content; buyers purchase it and open it. The
//! [`MarketClient`] talks to the ledger, durable storage, and the
//! access-control service. It holds no wallet: every call that acts for a user
//! takes the user's [`Wallet`] explicitly.
//!
//! [`Wallet`]: promptlock::services::wallet::Wallet
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub(crate) mod retry;

pub use api::PublishedContent;
pub use client::MarketClient;
pub use config::Config;
pub use error::{MarketClientError, Result};
