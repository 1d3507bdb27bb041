use crate::{
    config::Config,
    error::Result,
    utils::{report_test_results, TestResult},
    TestType,
};

pub mod access_control;
pub mod config_files;
pub mod end_to_end;
pub mod index;
pub mod settlement;

pub async fn run(test_type: TestType, config: &Config) -> Result<Vec<TestResult>> {
    match test_type {
        TestType::All => run_all(config).await,
        TestType::AccessControl => access_control::run_tests(config).await,
        TestType::ConfigFiles => config_files::run_tests(config).await,
        TestType::E2E => end_to_end::run_tests(config).await,
        TestType::Index => index::run_tests(config).await,
        TestType::Settlement => settlement::run_tests(config).await,
    }
}

pub async fn run_all(config: &Config) -> Result<Vec<TestResult>> {
    let config_file_results = config_files::run_tests(config).await?;
    let settlement_results = settlement::run_tests(config).await?;
    let access_control_results = access_control::run_tests(config).await?;
    let end_to_end_results = end_to_end::run_tests(config).await?;
    let index_results = index::run_tests(config).await?;

    println!(
        "config file tests: {}",
        report_test_results(&config_file_results)
    );
    println!(
        "settlement tests: {}",
        report_test_results(&settlement_results)
    );
    println!(
        "access control tests: {}",
        report_test_results(&access_control_results)
    );
    println!(
        "end to end tests: {}",
        report_test_results(&end_to_end_results)
    );
    println!("index tests: {}", report_test_results(&index_results));

    Ok([
        config_file_results,
        settlement_results,
        access_control_results,
        end_to_end_results,
        index_results,
    ]
    .concat())
}
