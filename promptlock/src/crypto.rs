//! Application-specific cryptographic types and operations.
//!
//! Defines the content key used to encrypt payloads, the access-control
//! service's key, wallet signing keys, and the address derivations used by the
//! settlement program. Public functions here are mostly wrappers around
//! multiple low-level cryptographic steps.

mod address;
mod content_key;
mod generic;
mod service_key;
mod signing;

pub use address::{custody_address, listing_address, receipt_address};
pub use content_key::ContentKey;
pub use generic::CryptoError;
pub use service_key::ServiceKey;
pub use signing::{verify_wallet_signature, wallet_address, WalletKeyPair};
