use crate::{config::RetryConfig, MarketClientError};
use std::{future::Future, time::Duration};
use tracing::warn;

/// Run `call` under `timeout`, retrying transient failures with exponential
/// backoff. Errors of any other category are returned immediately.
pub(crate) async fn with_retry<T, E, F, Fut>(
    operation: &'static str,
    timeout: Duration,
    policy: &RetryConfig,
    mut call: F,
) -> Result<T, MarketClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<MarketClientError>,
{
    let mut backoff = policy.initial_backoff;
    let mut attempt = 1;
    loop {
        let result = match tokio::time::timeout(timeout, call()).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(MarketClientError::Timeout(operation)),
        };

        match result {
            Err(e) if e.category().is_retryable() && attempt < policy.max_attempts => {
                warn!(
                    "{} failed on attempt {}/{}: {}. Retrying in {:?}.",
                    operation, attempt, policy.max_attempts, e, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(policy.max_backoff);
                attempt += 1;
            }
            result => return result,
        }
    }
}
