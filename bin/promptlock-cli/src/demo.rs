//! A seller and a buyer trading one piece of content on an in-process market.

use crate::{config::Config, CliError};
use promptlock::{
    constants::{LAMPORTS_PER_TOKEN, PLATFORM_TREASURY},
    crypto::WalletKeyPair,
    infrastructure::logging::init_logging,
    services::wallet::Wallet,
    types::content::ContentId,
};
use promptlock_access_server::{AccessServer, Config as AccessServerConfig};
use promptlock_client::{Config as ClientConfig, MarketClient};
use promptlock_index::Indexer;
use promptlock_memory::{
    Config as StorageConfig, MemoryAuditStore, MemoryIndexStore, MemoryStorage,
};
use promptlock_settlement::{Ledger, ProgramConfig};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tracing::info;

pub(crate) const SAMPLE_PROMPT: &str = "You are a patient tutor. Explain each step \
before giving the answer, and ask one question to check understanding.";

/// Starting balance of each demo wallet.
const AIRDROP: u64 = 10 * LAMPORTS_PER_TOKEN;

pub(crate) struct Listing {
    pub content: Vec<u8>,
    pub content_id: String,
    pub title: String,
    pub price: u64,
}

pub(crate) async fn run(
    config: &Config,
    service_key: Option<Vec<u8>>,
    listing: Listing,
) -> Result<(), CliError> {
    let access_config = AccessServerConfig::from_file(&config.access_server, service_key)?;
    let _guards = init_logging(&access_config.logging)?;
    let client_config = ClientConfig::from_file(&config.client)?;
    let program_config = ProgramConfig::from_file(&config.program)?;
    let storage_config = StorageConfig::from_file(&config.storage)?;
    let content_id = ContentId::new(listing.content_id)?;

    let ledger = Arc::new(Ledger::new(program_config));
    let access = AccessServer::new(
        Arc::new(MemoryAuditStore::new()),
        ledger.clone(),
        access_config,
    );
    let client = MarketClient::new(
        client_config,
        ledger.clone(),
        Arc::new(MemoryStorage::new(storage_config)),
        Arc::new(access),
    );
    let indexer = Indexer::new(ledger.clone(), Arc::new(MemoryIndexStore::new()));

    let mut rng = StdRng::from_entropy();
    let seller = WalletKeyPair::generate(&mut rng);
    let buyer = WalletKeyPair::generate(&mut rng);
    let _ = ledger.airdrop(&seller.address(), AIRDROP).await?;
    let _ = ledger.airdrop(&buyer.address(), AIRDROP).await?;
    info!("Seller {} and buyer {} funded", seller.address(), buyer.address());

    let published = client
        .publish(
            &listing.content,
            content_id.clone(),
            &listing.title,
            listing.price,
            &seller,
        )
        .await?;
    println!(
        "Listed {} at {} tokens (bundle {}, tx {})",
        content_id,
        tokens(listing.price),
        published.storage_pointer,
        published.receipt.signature
    );
    println!(
        "Buyer has access before purchase: {}",
        client.has_access(&buyer.address(), &content_id).await?
    );

    let seller_before = client.balance(&seller.address()).await?;
    let treasury_before = client.balance(&PLATFORM_TREASURY).await?;
    let receipt = client.buy_content(content_id.clone(), &buyer).await?;
    println!("Purchased in slot {} (tx {})", receipt.slot, receipt.signature);
    println!(
        "Seller received {} tokens, treasury received {} tokens",
        tokens(client.balance(&seller.address()).await? - seller_before),
        tokens(client.balance(&PLATFORM_TREASURY).await? - treasury_before)
    );
    println!(
        "Buyer has access after purchase: {}",
        client.has_access(&buyer.address(), &content_id).await?
    );

    let opened = client.open_content(&content_id, &buyer).await?;
    if opened != listing.content {
        return Err(CliError::ContentMismatch);
    }
    println!("Buyer opened {} bytes of content", opened.len());

    let _ = indexer.sync().await?;
    for course in indexer.courses().await? {
        println!(
            "Catalog: {} \"{}\" by {}, {} purchase(s)",
            course.content_id, course.title, course.seller, course.purchase_count
        );
    }

    Ok(())
}

fn tokens(lamports: u64) -> String {
    format!(
        "{}.{:09}",
        lamports / LAMPORTS_PER_TOKEN,
        lamports % LAMPORTS_PER_TOKEN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_amounts_keep_every_lamport() {
        assert_eq!(tokens(LAMPORTS_PER_TOKEN), "1.000000000");
        assert_eq!(tokens(950_000_000), "0.950000000");
        assert_eq!(tokens(12 * LAMPORTS_PER_TOKEN + 5), "12.000000005");
    }
}
