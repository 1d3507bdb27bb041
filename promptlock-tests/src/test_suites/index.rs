//! The off-chain catalog built from ledger events.

use colored::Colorize;
use promptlock::{
    constants::LAMPORTS_PER_TOKEN,
    services::{ledger::LedgerRpc, wallet::Wallet},
};

use crate::{
    config::Config,
    error::Result,
    market::TestMarket,
    run_parallel,
    utils::{report_test_results, tagged_content_id, TestResult},
};

const BALANCE: u64 = 10 * LAMPORTS_PER_TOKEN;

pub async fn run_tests(config: &Config) -> Result<Vec<TestResult>> {
    println!("{}", "Running index tests".cyan());

    let results = run_parallel!(
        config.clone(),
        catalog_follows_listings(config.clone()),
        library_follows_purchases(config.clone()),
        resync_is_idempotent(config.clone()),
        failed_transactions_are_not_indexed(config.clone()),
    )?;

    println!("index tests: {}", report_test_results(&results));

    Ok(results)
}

async fn catalog_follows_listings(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let first = tagged_content_id("first")?;
    let second = tagged_content_id("second")?;

    let published = market
        .client
        .publish(b"one", first.clone(), "First", 1_000, &seller)
        .await?;
    let _ = market
        .client
        .publish(b"two", second.clone(), "Second", 2_000, &seller)
        .await?;
    assert_eq!(market.indexer.sync().await?, 2);

    let courses = market.indexer.courses().await?;
    let ids: Vec<_> = courses.iter().map(|course| course.content_id.clone()).collect();
    assert_eq!(ids, [first.clone(), second]);

    let course = market.indexer.course(&first).await?.unwrap();
    assert_eq!(course.seller, seller.address());
    assert_eq!(course.price, 1_000);
    assert_eq!(course.storage_pointer, published.storage_pointer);
    assert_eq!(course.tx_signature, published.receipt.signature);
    assert_eq!(course.listed_at_slot, published.receipt.slot);

    Ok(())
}

async fn library_follows_purchases(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let _ = market
        .client
        .publish(b"lesson", content_id.clone(), "Lesson", 1_000, &seller)
        .await?;
    let receipt = market.client.buy_content(content_id.clone(), &buyer).await?;
    let _ = market.indexer.sync().await?;

    let library = market.indexer.library(&buyer.address()).await?;
    assert_eq!(library.len(), 1);
    assert_eq!(library[0].content_id, content_id);
    assert_eq!(library[0].tx_signature, receipt.signature);
    assert_eq!(library[0].purchased_at_slot, receipt.slot);

    assert!(market.indexer.library(&seller.address()).await?.is_empty());
    let course = market.indexer.course(&content_id).await?.unwrap();
    assert_eq!(course.purchase_count, 1);

    Ok(())
}

async fn resync_is_idempotent(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let _ = market
        .client
        .publish(b"lesson", content_id.clone(), "Lesson", 1_000, &seller)
        .await?;
    let _ = market.client.buy_content(content_id.clone(), &buyer).await?;
    assert_eq!(market.indexer.sync().await?, 2);
    assert_eq!(market.indexer.sync().await?, 0);

    // Replaying the whole log changes nothing.
    for event in market.ledger.events_since(0).await? {
        assert!(!market.indexer.apply(&event).await?);
    }
    let course = market.indexer.course(&content_id).await?.unwrap();
    assert_eq!(course.purchase_count, 1);
    assert_eq!(market.indexer.library(&buyer.address()).await?.len(), 1);

    Ok(())
}

async fn failed_transactions_are_not_indexed(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let _ = market
        .client
        .publish(b"lesson", content_id.clone(), "Lesson", 0, &seller)
        .await
        .unwrap_err();
    let _ = market.indexer.sync().await?;

    assert!(market.indexer.courses().await?.is_empty());
    assert!(market.client.listing(&content_id).await?.is_none());

    Ok(())
}
