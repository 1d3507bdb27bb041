//! Settlement program behavior observed through the client and the ledger.

use colored::Colorize;
use promptlock::{
    constants::{LAMPORTS_PER_TOKEN, PLATFORM_TREASURY},
    crypto::{receipt_address, WalletKeyPair},
    services::{
        ledger::{LedgerError, LedgerRpc, ProgramError},
        wallet::Wallet,
    },
    types::{
        content::{ContentId, StoragePointer},
        transaction::{Instruction, SignedTransaction},
    },
    ErrorCategory,
};
use promptlock_client::MarketClientError;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::Config,
    error::Result,
    market::TestMarket,
    run_parallel,
    utils::{report_test_results, tagged, tagged_content_id, TestResult},
};

const BALANCE: u64 = 10 * LAMPORTS_PER_TOKEN;

pub async fn run_tests(config: &Config) -> Result<Vec<TestResult>> {
    println!("{}", "Running settlement tests".cyan());

    let results = run_parallel!(
        config.clone(),
        listing_reads_back_exactly(config.clone()),
        listing_charges_rent(config.clone()),
        duplicate_listing_is_a_conflict(config.clone()),
        zero_price_is_rejected(config.clone()),
        purchase_splits_payment(config.clone()),
        repeat_purchase_changes_nothing(config.clone()),
        wrong_treasury_is_unauthorized(config.clone()),
        insufficient_funds_is_rejected(config.clone()),
        concurrent_purchases_have_one_winner(config.clone()),
        concurrent_listings_have_one_winner(config.clone()),
        purchase_of_unlisted_content_fails(config.clone()),
    )?;

    println!("settlement tests: {}", report_test_results(&results));

    Ok(results)
}

async fn list(
    market: &TestMarket,
    seller: &WalletKeyPair,
    name: &str,
    price: u64,
) -> Result<ContentId> {
    let content_id = tagged_content_id(name)?;
    let _ = market
        .client
        .list_content(
            content_id.clone(),
            StoragePointer::new(tagged("pointer")),
            "Course",
            price,
            seller,
        )
        .await?;
    Ok(content_id)
}

async fn listing_reads_back_exactly(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 1_234_567).await?;

    let listing = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listing.price, 1_234_567);
    assert_eq!(listing.seller, seller.address());
    assert_eq!(listing.purchase_count, 0);

    Ok(())
}

async fn listing_charges_rent(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 1_000).await?;

    let listing = market.client.listing(&content_id).await?.unwrap();
    assert!(listing.rent_deposit > 0);
    assert_eq!(
        market.client.balance(&seller.address()).await?,
        BALANCE - listing.rent_deposit
    );

    Ok(())
}

async fn duplicate_listing_is_a_conflict(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let other_seller = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 1_000).await?;

    let result = market
        .client
        .list_content(
            content_id.clone(),
            StoragePointer::new("elsewhere"),
            "Copy",
            1,
            &other_seller,
        )
        .await;
    assert_eq!(result.unwrap_err().category(), ErrorCategory::Conflict);

    let listing = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listing.seller, seller.address());
    assert_eq!(market.client.balance(&other_seller.address()).await?, BALANCE);

    Ok(())
}

async fn zero_price_is_rejected(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;

    let result = list(&market, &seller, "free", 0).await;
    assert!(result.is_err());
    assert_eq!(market.client.balance(&seller.address()).await?, BALANCE);

    Ok(())
}

async fn purchase_splits_payment(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 1_000_003).await?;

    let seller_before = market.client.balance(&seller.address()).await?;
    let treasury_before = market.client.balance(&PLATFORM_TREASURY).await?;
    let _ = market.client.buy_content(content_id.clone(), &buyer).await?;

    assert_eq!(
        market.client.balance(&seller.address()).await? - seller_before,
        950_002
    );
    assert_eq!(
        market.client.balance(&PLATFORM_TREASURY).await? - treasury_before,
        50_001
    );
    assert_eq!(
        market.client.balance(&buyer.address()).await?,
        BALANCE - 1_000_003
    );

    let receipt = receipt_address(&market.program_id(), &buyer.address(), &content_id);
    assert!(market.ledger.account_exists(&receipt).await?);
    let listing = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listing.purchase_count, 1);

    Ok(())
}

async fn repeat_purchase_changes_nothing(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 5_000).await?;
    let _ = market.client.buy_content(content_id.clone(), &buyer).await?;

    let buyer_before = market.client.balance(&buyer.address()).await?;
    let seller_before = market.client.balance(&seller.address()).await?;
    let result = market.client.buy_content(content_id.clone(), &buyer).await;
    assert!(matches!(
        result,
        Err(MarketClientError::Ledger(LedgerError::Program(
            ProgramError::AlreadyPurchased { .. }
        )))
    ));

    assert_eq!(market.client.balance(&buyer.address()).await?, buyer_before);
    assert_eq!(market.client.balance(&seller.address()).await?, seller_before);
    let listing = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listing.purchase_count, 1);

    Ok(())
}

async fn wrong_treasury_is_unauthorized(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 5_000).await?;
    let impostor = WalletKeyPair::generate(&mut StdRng::from_entropy());

    let transaction = SignedTransaction::sign(
        &buyer,
        &market.program_id(),
        Instruction::BuyContent {
            content_id,
            treasury: impostor.address(),
        },
    )
    .await?;
    let error = market
        .ledger
        .submit_transaction(transaction)
        .await
        .unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Authorization);

    assert_eq!(market.client.balance(&buyer.address()).await?, BALANCE);
    assert_eq!(market.client.balance(&impostor.address()).await?, 0);

    Ok(())
}

async fn insufficient_funds_is_rejected(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(1_000).await?;
    let content_id = list(&market, &seller, "course", 5_000).await?;

    let error = market
        .client
        .buy_content(content_id.clone(), &buyer)
        .await
        .unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Validation);
    assert_eq!(market.client.balance(&buyer.address()).await?, 1_000);
    assert!(!market.client.has_access(&buyer.address(), &content_id).await?);

    Ok(())
}

async fn concurrent_purchases_have_one_winner(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = list(&market, &seller, "course", 5_000).await?;

    let (first, second) = futures::join!(
        market.client.buy_content(content_id.clone(), &buyer),
        market.client.buy_content(content_id.clone(), &buyer),
    );
    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if first.is_err() { first } else { second };
    assert_eq!(loser.unwrap_err().category(), ErrorCategory::Conflict);

    assert_eq!(market.client.balance(&buyer.address()).await?, BALANCE - 5_000);

    Ok(())
}

async fn concurrent_listings_have_one_winner(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let first_seller = market.funded_wallet(BALANCE).await?;
    let second_seller = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let pointer = StoragePointer::new(tagged("pointer"));
    let (first, second) = futures::join!(
        market
            .client
            .list_content(content_id.clone(), pointer.clone(), "Course", 5_000, &first_seller),
        market
            .client
            .list_content(content_id.clone(), pointer.clone(), "Course", 5_000, &second_seller),
    );
    assert_eq!([&first, &second].iter().filter(|r| r.is_ok()).count(), 1);

    let (winner, loser, lost) = if first.is_ok() {
        (&first_seller, &second_seller, second)
    } else {
        (&second_seller, &first_seller, first)
    };
    assert!(matches!(
        lost.unwrap_err(),
        MarketClientError::Ledger(LedgerError::Program(ProgramError::ListingAlreadyExists(_)))
    ));

    let listed = market.client.listing(&content_id).await?.unwrap();
    assert_eq!(listed.seller, winner.address());
    assert_eq!(
        market.client.balance(&winner.address()).await?,
        BALANCE - listed.rent_deposit
    );
    assert_eq!(market.client.balance(&loser.address()).await?, BALANCE);

    Ok(())
}

async fn purchase_of_unlisted_content_fails(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let buyer = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("missing")?;

    let error = market
        .client
        .buy_content(content_id, &buyer)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        MarketClientError::Ledger(LedgerError::Program(ProgramError::ListingNotFound(_)))
    ));
    assert_eq!(market.client.balance(&buyer.address()).await?, BALANCE);

    Ok(())
}
