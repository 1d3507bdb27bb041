//! Full seller and buyer flows across every service.

use colored::Colorize;
use promptlock::{
    constants::{BUNDLE_CONTENT_TYPE, LAMPORTS_PER_TOKEN, PLATFORM_TREASURY},
    services::{storage::DurableStorage, wallet::Wallet},
    types::{
        bundle::{BundleMetadata, EncryptedBundle},
        condition::AccessCondition,
        content::ContentId,
    },
};
use promptlock_client::MarketClientError;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::Config,
    error::Result,
    market::TestMarket,
    run_parallel,
    utils::{random_bytes, report_test_results, tagged_content_id, TestResult},
};

const BALANCE: u64 = 10 * LAMPORTS_PER_TOKEN;

pub async fn run_tests(config: &Config) -> Result<Vec<TestResult>> {
    println!("{}", "Running end to end tests".cyan());

    let results = run_parallel!(
        config.clone(),
        course_1_is_sold_and_opened(config.clone()),
        published_bundle_is_self_describing(config.clone()),
        each_buyer_needs_their_own_receipt(config.clone()),
        identical_uploads_lock_independently(config.clone()),
    )?;

    println!("end to end tests: {}", report_test_results(&results));

    Ok(results)
}

async fn course_1_is_sold_and_opened(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let course_1 = ContentId::new("course_1")?;
    let plaintext = random_bytes(StdRng::from_entropy(), 64 * 1024);

    let _ = market
        .client
        .publish(
            &plaintext,
            course_1.clone(),
            "Course one",
            LAMPORTS_PER_TOKEN,
            &seller,
        )
        .await?;
    assert!(!market.client.has_access(&buyer.address(), &course_1).await?);

    let seller_before = market.client.balance(&seller.address()).await?;
    let treasury_before = market.client.balance(&PLATFORM_TREASURY).await?;
    let _ = market.client.buy_content(course_1.clone(), &buyer).await?;

    assert_eq!(
        market.client.balance(&seller.address()).await? - seller_before,
        950_000_000
    );
    assert_eq!(
        market.client.balance(&PLATFORM_TREASURY).await? - treasury_before,
        50_000_000
    );
    assert!(market.client.has_access(&buyer.address(), &course_1).await?);
    assert_eq!(
        market.client.open_content(&course_1, &buyer).await?,
        plaintext
    );

    Ok(())
}

async fn published_bundle_is_self_describing(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;
    let plaintext = b"A prompt worth paying for".to_vec();

    let published = market
        .client
        .publish(&plaintext, content_id.clone(), "Prompts", 1_000, &seller)
        .await?;
    let bytes = market.storage.get(&published.storage_pointer).await?;
    let bundle = EncryptedBundle::from_bytes(&bytes)?;

    assert_eq!(bundle.metadata.content_id, content_id);
    assert_eq!(bundle.metadata.title, "Prompts");
    assert_eq!(bundle.metadata.content_type, BUNDLE_CONTENT_TYPE);
    assert_eq!(
        bundle.lock.condition,
        AccessCondition::receipt_exists(market.program_id(), content_id.clone())
    );
    assert!(!bytes
        .windows(plaintext.len())
        .any(|window| window == plaintext.as_slice()));

    let listing = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listing.storage_pointer, published.storage_pointer);

    Ok(())
}

async fn each_buyer_needs_their_own_receipt(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let onlooker = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let _ = market
        .client
        .publish(b"lesson", content_id.clone(), "Lesson", 1_000, &seller)
        .await?;
    let _ = market.client.buy_content(content_id.clone(), &buyer).await?;

    assert_eq!(market.client.open_content(&content_id, &buyer).await?, b"lesson");
    let result = market.client.open_content(&content_id, &onlooker).await;
    assert!(matches!(result, Err(MarketClientError::AccessDenied)));

    let _ = market.client.buy_content(content_id.clone(), &onlooker).await?;
    assert_eq!(
        market.client.open_content(&content_id, &onlooker).await?,
        b"lesson"
    );
    let listing = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listing.purchase_count, 2);

    Ok(())
}

async fn identical_uploads_lock_independently(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;
    let condition = AccessCondition::receipt_exists(market.program_id(), content_id.clone());
    let metadata = BundleMetadata::new(content_id, "Same");

    let first = market
        .client
        .encrypt(b"same bytes", condition.clone(), metadata.clone(), &seller)
        .await?;
    let second = market
        .client
        .encrypt(b"same bytes", condition, metadata, &seller)
        .await?;

    // Fresh keys and IVs per upload.
    assert_ne!(first.payload.iv, second.payload.iv);
    assert_ne!(first.payload.ciphertext, second.payload.ciphertext);
    assert_ne!(first.lock.lock_hash, second.lock.lock_hash);

    Ok(())
}
