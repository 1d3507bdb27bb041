//! Interfaces to the collaborators the marketplace core talks to.
//!
//! Each collaborator is a trait so the core can run against in-process
//! implementations or remote ones. Errors crossing these seams are plain
//! data and carry no server internals.

pub mod access_control;
pub mod ledger;
pub mod storage;
pub mod wallet;
