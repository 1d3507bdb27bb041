//! Utilities for our logging (tracing) infrastructure.

use crate::{config::LoggingConfig, PromptLockError};
use std::{ffi::OsStr, fmt::Debug, path::Path};
use tracing::{warn, Level, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Targets, prelude::*};

/// Crate names whose events go to stdout and to the workspace log file.
const OUR_TARGETS: &[&str] = &[
    "promptlock",
    "promptlock_settlement",
    "promptlock_access_server",
    "promptlock_client",
    "promptlock_index",
    "promptlock_memory",
    "promptlock_cli",
    "promptlock_tests",
];

/// For the current active span, record `field_value` for the field
/// `field_name`. The field must already be declared on the span, e.g. with
/// `#[instrument(fields(request_id))]`.
///
/// Every event inside the span then carries the value, for example:
/// ```text
///   INFO promptlock_access_server::operations::unlock: Starting unlock operation.
///     in promptlock_access_server::server::handle_request with request_id: "9cb5e6fe-...", action: Unlock
/// ```
///
/// In debug builds, recording an undeclared field logs a warning.
pub fn record_field(field_name: &str, field_value: &dyn Debug) {
    if cfg!(debug_assertions) && !Span::current().has_field(field_name) {
        warn!("Field {} not defined in current span!", field_name);
    }

    let _ = Span::current().record(field_name, &format!("{field_value:?}"));
}

/// Writer guards for the file layers. Keep this alive for the lifetime of the
/// program; dropping it flushes and stops the writers.
#[derive(Default)]
pub struct LoggingGuards {
    _all_layer_guard: Option<WorkerGuard>,
    _promptlock_layer_guard: Option<WorkerGuard>,
}

/// Install the global subscriber:
/// 1) Events from our crates at `stdout_log_level` or above go to stdout.
/// 2) (optional) Every event from our crates goes to a JSON log file.
/// 3) (optional) Every event from any crate goes to a second JSON log file.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuards, PromptLockError> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(our_targets_filter(config.stdout_log_level));

    let guards = match &config.log_files {
        Some(file_config) => {
            let (all_logs_dir, all_logs_file) = get_paths(&file_config.all_logs_file_name)?;
            let (our_logs_dir, our_logs_file) =
                get_paths(&file_config.promptlock_logs_file_name)?;

            let all_appender = tracing_appender::rolling::hourly(all_logs_dir, all_logs_file);
            let (non_blocking, _all_layer_guard) = tracing_appender::non_blocking(all_appender);
            let all_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking);

            let our_appender = tracing_appender::rolling::hourly(our_logs_dir, our_logs_file);
            let (non_blocking, _promptlock_layer_guard) =
                tracing_appender::non_blocking(our_appender);
            let our_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(our_targets_filter(Level::TRACE));

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(our_layer)
                .with(all_layer)
                .try_init()
                .map_err(|e| PromptLockError::LoggingInit(e.to_string()))?;

            LoggingGuards {
                _all_layer_guard: Some(_all_layer_guard),
                _promptlock_layer_guard: Some(_promptlock_layer_guard),
            }
        }
        None => {
            tracing_subscriber::registry()
                .with(stdout_layer)
                .try_init()
                .map_err(|e| PromptLockError::LoggingInit(e.to_string()))?;
            LoggingGuards::default()
        }
    };

    Ok(guards)
}

/// Split a log file path into the directory and file name that
/// `tracing_appender` expects.
fn get_paths(path: &Path) -> Result<(&Path, &OsStr), PromptLockError> {
    let dir = path
        .parent()
        .ok_or_else(|| PromptLockError::InvalidLogFilePath(path.into()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| PromptLockError::InvalidLogFilePath(path.into()))?;
    Ok((dir, file_name))
}

fn our_targets_filter(level: Level) -> Targets {
    OUR_TARGETS
        .iter()
        .fold(Targets::new(), |targets, target| {
            targets.with_target(*target, level)
        })
}
