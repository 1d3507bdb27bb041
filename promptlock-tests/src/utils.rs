//! Various testing utilities

use std::sync::{Arc, Mutex};

use crate::{error::Result, Config};
use colored::Colorize;
use futures::Future;
use promptlock::types::content::ContentId;
use rand::{distributions::Alphanumeric, Rng};

/// Add random text to the end of a string
/// # Example
/// ```
/// let course = tagged("course");
/// println!("{course}");
/// // Prints something like "course-1h65k35"
/// ```
pub fn tagged(text: impl AsRef<str>) -> String {
    let text = text.as_ref();
    let tag: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();

    format!("{text}-{tag}")
}

/// A content id that no other test case uses.
pub fn tagged_content_id(text: impl AsRef<str>) -> Result<ContentId> {
    Ok(ContentId::new(tagged(text))?)
}

/// Generate a sequence of random bytes with the given length.
pub fn random_bytes(mut rng: impl Rng, len: usize) -> Vec<u8> {
    std::iter::repeat_with(|| rng.gen()).take(len).collect()
}

/// Pass a list of async test functions with parameters included.
/// All test functions must return [`Result<()>`].
/// Tests will run in parallel and report the names of any failing test.
/// # Example
/// ```no_run
/// run_parallel(config.clone(), test_1(config.clone()), test_2(config.clone()))
/// ```
#[macro_export]
macro_rules! run_parallel {
    ($config:expr, $($task:expr),+,) => {
        run_parallel!($config, $($task),+)
    };
    ($config:expr, $($task:expr),+) => {
        // Stick this in a scope so it can return a result
        {
            use std::sync::{Arc, Mutex};
            use $crate::{error::PromptLockTestError, utils::TestResult};

            let results = Arc::new(Mutex::new(Vec::new()));
            tokio::try_join!($($crate::utils::run_test_case($config, stringify!($task), $task, results.clone())),+)?;

            let results = results.lock().unwrap().clone();

            Ok::<Vec<TestResult>, PromptLockTestError>(results)
        }
    };
}

/// Runs a test case and records a failure for any panic raised by an
/// `assert` macro.
pub async fn run_test_case(
    config: Config,
    name: &str,
    task: impl Future<Output = Result<()>> + Send + 'static,
    results: Arc<Mutex<Vec<TestResult>>>,
) -> Result<()> {
    use futures::FutureExt;
    use TestResult::*;

    let name = name.split('(').next().unwrap_or(name);
    let mut test_result = format!("\n{name}:\n");

    let outcome = if !config.filters.matches(name) {
        test_result.push_str(&format!("{}", "skipped\n".bright_blue()));
        Skipped
    } else {
        match tokio::spawn(task).catch_unwind().await {
            Ok(Ok(Ok(()))) => {
                test_result.push_str(&format!("{}", "ok\n".green()));
                Passed
            }
            Ok(Ok(Err(e))) => {
                test_result.push_str(&format!("{}: {}\n", "failed".red(), e));
                Failed
            }
            Ok(Err(join_error)) => {
                test_result.push_str(&format!("{}", "Test panicked\n".red()));
                if let Ok(panic) = join_error.try_into_panic() {
                    if let Some(message) = panic.downcast_ref::<&str>() {
                        test_result.push_str(&format!("{message}\n"));
                    }
                    if let Some(message) = panic.downcast_ref::<String>() {
                        test_result.push_str(&format!("{message}\n"));
                    }
                }
                Failed
            }
            Err(err) => {
                test_result.push_str(&format!("failed: {:?}\n", err));
                Failed
            }
        }
    };

    results.lock().unwrap().push(outcome);
    println!("{test_result}");

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

pub fn report_test_results(results: &[TestResult]) -> String {
    use TestResult::*;

    let any_failed = results.iter().any(|r| *r == Failed);
    if any_failed {
        return format!("{}", "FAILED".red());
    }

    let num_results = results.len();
    let num_skipped = results.iter().filter(|r| **r == Skipped).count();

    if num_skipped == num_results {
        format!("{}", "SKIPPED".bright_blue())
    } else if num_skipped > 0 {
        format!(
            "{} ({} {})",
            "PASSED".green(),
            num_skipped,
            "SKIPPED".bright_blue()
        )
    } else {
        format!("{}", "PASSED".green())
    }
}
