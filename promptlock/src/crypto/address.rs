//! Deterministic account address derivation.
//!
//! An address is the SHA3-256 digest of the program id, a namespace, and a
//! list of seeds, each length-prefixed. The same inputs always give the same
//! address, so a record's existence can be checked without an index.

use crate::{
    constants::{CUSTODY_NAMESPACE, LISTING_NAMESPACE, RECEIPT_NAMESPACE},
    types::{
        content::ContentId,
        identity::{AccountAddress, ProgramId, WalletAddress},
    },
};
use sha3::{Digest, Sha3_256};

fn derive(program_id: &ProgramId, namespace: &str, seeds: &[&[u8]]) -> [u8; 32] {
    let hasher = Sha3_256::new()
        .chain_update(program_id.as_bytes())
        .chain_update((namespace.len() as u64).to_be_bytes())
        .chain_update(namespace);

    seeds
        .iter()
        .fold(hasher, |hasher, seed| {
            hasher
                .chain_update((seed.len() as u64).to_be_bytes())
                .chain_update(seed)
        })
        .finalize()
        .into()
}

/// Location of the listing for `content_id`.
pub fn listing_address(program_id: &ProgramId, content_id: &ContentId) -> AccountAddress {
    AccountAddress::from_bytes(derive(
        program_id,
        LISTING_NAMESPACE,
        &[content_id.as_bytes()],
    ))
}

/// Location of the receipt proving `buyer` purchased `content_id`.
pub fn receipt_address(
    program_id: &ProgramId,
    buyer: &WalletAddress,
    content_id: &ContentId,
) -> AccountAddress {
    AccountAddress::from_bytes(derive(
        program_id,
        RECEIPT_NAMESPACE,
        &[buyer.as_bytes(), content_id.as_bytes()],
    ))
}

/// Program-owned balance that holds purchase funds while they are split.
pub fn custody_address(program_id: &ProgramId) -> WalletAddress {
    WalletAddress::from_bytes(derive(program_id, CUSTODY_NAMESPACE, &[]))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::PROGRAM_ID;
    use std::collections::HashSet;

    fn id(s: &str) -> ContentId {
        ContentId::new(s).unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let buyer = WalletAddress::from_bytes([4; 32]);
        assert_eq!(
            listing_address(&PROGRAM_ID, &id("course_1")),
            listing_address(&PROGRAM_ID, &id("course_1"))
        );
        assert_eq!(
            receipt_address(&PROGRAM_ID, &buyer, &id("course_1")),
            receipt_address(&PROGRAM_ID, &buyer, &id("course_1"))
        );
    }

    #[test]
    fn distinct_content_ids_get_distinct_addresses() {
        let mut uniq = HashSet::new();
        assert!((0..1000)
            .map(|i| listing_address(&PROGRAM_ID, &id(&format!("course_{i}"))))
            .all(|address| uniq.insert(address)));
    }

    #[test]
    fn receipts_depend_on_buyer() {
        let content_id = id("course_1");
        let first = receipt_address(&PROGRAM_ID, &WalletAddress::from_bytes([1; 32]), &content_id);
        let second = receipt_address(&PROGRAM_ID, &WalletAddress::from_bytes([2; 32]), &content_id);
        assert_ne!(first, second);
    }

    #[test]
    fn namespaces_and_programs_are_separated() {
        let content_id = id("course_1");
        let buyer = WalletAddress::from_bytes([1; 32]);
        let other_program = ProgramId::from_bytes([8; 32]);

        assert_ne!(
            listing_address(&PROGRAM_ID, &content_id),
            receipt_address(&PROGRAM_ID, &buyer, &content_id)
        );
        assert_ne!(
            listing_address(&PROGRAM_ID, &content_id),
            listing_address(&other_program, &content_id)
        );
        assert_ne!(custody_address(&PROGRAM_ID), custody_address(&other_program));
    }
}
