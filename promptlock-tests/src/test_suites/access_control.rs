//! Locking and unlocking content keys through the access-control service.

use colored::Colorize;
use promptlock::{
    constants::LAMPORTS_PER_TOKEN,
    services::{access_control::AccessControlError, wallet::Wallet},
    types::{
        audit_event::EventStatus,
        bundle::{BundleMetadata, LockHash},
        condition::AccessCondition,
        operations::ServiceAction,
    },
    ErrorCategory,
};
use promptlock_access_server::DataStore;
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
    println!("{}", "Running access control tests".cyan());

    let results = run_parallel!(
        config.clone(),
        open_condition_admits_any_wallet(config.clone()),
        minimum_balance_is_checked_live(config.clone()),
        receipt_condition_denies_non_buyers(config.clone()),
        altered_condition_fails_integrity(config.clone()),
        altered_lock_hash_fails_integrity(config.clone()),
        lock_and_unlock_are_audited(config.clone()),
    )?;

    println!("access control tests: {}", report_test_results(&results));

    Ok(results)
}

fn metadata() -> Result<BundleMetadata> {
    Ok(BundleMetadata::new(tagged_content_id("course")?, "Course"))
}

async fn open_condition_admits_any_wallet(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let stranger = market.funded_wallet(0).await?;
    let plaintext = random_bytes(StdRng::from_entropy(), 4096);

    let bundle = market
        .client
        .encrypt(
            &plaintext,
            AccessCondition::MinimumBalance { lamports: 0 },
            metadata()?,
            &seller,
        )
        .await?;
    assert_ne!(bundle.payload.ciphertext, plaintext);

    assert_eq!(market.client.decrypt(&bundle, &seller).await?, plaintext);
    assert_eq!(market.client.decrypt(&bundle, &stranger).await?, plaintext);

    Ok(())
}

async fn minimum_balance_is_checked_live(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let holder = market.funded_wallet(0).await?;

    let bundle = market
        .client
        .encrypt(
            b"members only",
            AccessCondition::MinimumBalance { lamports: 500 },
            metadata()?,
            &seller,
        )
        .await?;

    let result = market.client.decrypt(&bundle, &holder).await;
    assert!(matches!(result, Err(MarketClientError::AccessDenied)));

    let _ = market.ledger.airdrop(&holder.address(), 500).await?;
    assert_eq!(market.client.decrypt(&bundle, &holder).await?, b"members only");

    Ok(())
}

async fn receipt_condition_denies_non_buyers(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let stranger = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let bundle = market
        .client
        .encrypt(
            b"paid content",
            AccessCondition::receipt_exists(market.program_id(), content_id.clone()),
            BundleMetadata::new(content_id, "Course"),
            &seller,
        )
        .await?;

    // Locking content doesn't grant its seller access either.
    for wallet in [&seller, &stranger] {
        let error = market.client.decrypt(&bundle, wallet).await.unwrap_err();
        assert!(matches!(error, MarketClientError::AccessDenied));
        assert_eq!(error.category(), ErrorCategory::Authorization);
    }

    Ok(())
}

async fn altered_condition_fails_integrity(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let content_id = tagged_content_id("course")?;

    let mut bundle = market
        .client
        .encrypt(
            b"paid content",
            AccessCondition::receipt_exists(market.program_id(), content_id.clone()),
            BundleMetadata::new(content_id, "Course"),
            &seller,
        )
        .await?;
    bundle.lock.condition = AccessCondition::MinimumBalance { lamports: 0 };

    let error = market.client.decrypt(&bundle, &seller).await.unwrap_err();
    assert!(matches!(
        error,
        MarketClientError::AccessControl(AccessControlError::ConditionMismatch)
    ));
    assert_eq!(error.category(), ErrorCategory::Integrity);

    Ok(())
}

async fn altered_lock_hash_fails_integrity(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;

    let mut bundle = market
        .client
        .encrypt(
            b"content",
            AccessCondition::MinimumBalance { lamports: 0 },
            metadata()?,
            &seller,
        )
        .await?;
    bundle.lock.lock_hash = LockHash("00".repeat(32));

    let error = market.client.decrypt(&bundle, &seller).await.unwrap_err();
    assert!(matches!(
        error,
        MarketClientError::AccessControl(AccessControlError::LockHashMismatch)
    ));
    assert!(!error.category().is_retryable());

    Ok(())
}

async fn lock_and_unlock_are_audited(config: Config) -> Result<()> {
    let market = TestMarket::new(&config)?;
    let seller = market.funded_wallet(BALANCE).await?;
    let reader = market.funded_wallet(0).await?;

    let bundle = market
        .client
        .encrypt(
            b"content",
            AccessCondition::MinimumBalance { lamports: 1 },
            metadata()?,
            &seller,
        )
        .await?;
    let _ = market.client.decrypt(&bundle, &reader).await.unwrap_err();

    let locks = market
        .audit
        .find_audit_events(&seller.address(), Some(ServiceAction::Lock))
        .await?;
    let statuses: Vec<_> = locks.iter().map(|event| event.status()).collect();
    assert_eq!(statuses, [EventStatus::Started, EventStatus::Successful]);
    assert_eq!(locks[0].request_id(), locks[1].request_id());

    let unlocks = market
        .audit
        .find_audit_events(&reader.address(), None)
        .await?;
    let statuses: Vec<_> = unlocks.iter().map(|event| event.status()).collect();
    assert_eq!(statuses, [EventStatus::Started, EventStatus::Failed]);
    assert!(unlocks
        .iter()
        .all(|event| event.action() == ServiceAction::Unlock));
    assert_eq!(unlocks[1].lock_hash(), Some(&bundle.lock.lock_hash));

    Ok(())
}
