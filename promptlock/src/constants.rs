use crate::types::identity::{ProgramId, WalletAddress};

/// Address of the deployed settlement program. Used as the domain for every
/// derived account address.
pub const PROGRAM_ID: ProgramId = ProgramId::from_bytes([
    0xc5, 0x48, 0xce, 0x20, 0xed, 0x03, 0xcb, 0xc6, 0x3b, 0xe8, 0x3f, 0xe5, 0xd9, 0xf8, 0x2b, 0xee,
    0x15, 0xe0, 0x41, 0xb1, 0x21, 0x44, 0x11, 0xb6, 0xc0, 0xc2, 0x03, 0xee, 0x50, 0x9f, 0x1c, 0xd0,
]);

/// The only account allowed to receive the platform share of a purchase.
pub const PLATFORM_TREASURY: WalletAddress = WalletAddress::from_bytes([
    0xee, 0xcf, 0xb0, 0x8b, 0x9a, 0x99, 0xab, 0xbe, 0x8a, 0x47, 0x80, 0x60, 0xea, 0xf0, 0x75, 0xc2,
    0x8a, 0xc5, 0xcf, 0xe5, 0x0b, 0x29, 0xe6, 0xac, 0x58, 0x71, 0x1a, 0xc2, 0xaf, 0x1b, 0x7b, 0x47,
]);

/// Namespaces for derived account addresses.
pub const LISTING_NAMESPACE: &str = "listing";
pub const RECEIPT_NAMESPACE: &str = "receipt";
pub const CUSTODY_NAMESPACE: &str = "custody";

/// A content id must fit in a single derivation seed.
pub const MAX_CONTENT_ID_LEN: usize = 32;
pub const MAX_TITLE_LEN: usize = 128;
pub const MAX_STORAGE_POINTER_LEN: usize = 128;

pub const BPS_DENOMINATOR: u64 = 10_000;
pub const DEFAULT_SELLER_SHARE_BPS: u64 = 9_500;
pub const DEFAULT_RENT_LAMPORTS_PER_BYTE: u64 = 6_960;

/// Smallest units per whole native token.
pub const LAMPORTS_PER_TOKEN: u64 = 1_000_000_000;

/// Default bundle metadata values.
pub const BUNDLE_CONTENT_TYPE: &str = "ai-prompt";
pub const BUNDLE_VERSION: &str = "2.0";
pub const APP_NAME: &str = "PromptLock";
