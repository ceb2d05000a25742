//! Logging and observability
//!
//! Structured logging through `tracing`, with console output and optional
//! JSON file logging with rotation.
//!
//! # Example
//!
//! ```no_run
//! use notion_diary::logging::init_logging;
//! use notion_diary::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a sync run
///
/// # Example
///
/// ```no_run
/// use notion_diary::log_sync_start;
///
/// log_sync_start!("0123abcd", 3, false);
/// ```
#[macro_export]
macro_rules! log_sync_start {
    ($database_id:expr, $concurrency:expr, $dry_run:expr) => {
        tracing::info!(
            database_id = %$database_id,
            concurrency = $concurrency,
            dry_run = $dry_run,
            "Starting sync"
        );
    };
}

/// Log the completion of a sync run
///
/// # Example
///
/// ```no_run
/// use notion_diary::log_sync_complete;
/// use std::time::Duration;
///
/// log_sync_complete!(12, 1, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_sync_complete {
    ($succeeded:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            succeeded = $succeeded,
            failed = $failed,
            duration_ms = $duration.as_millis() as u64,
            "Sync completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use notion_diary::log_error_with_context;
/// use notion_diary::domain::DiaryError;
///
/// let error = DiaryError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use notion_diary::log_retry_attempt;
///
/// log_retry_attempt!("query_page", 2, 5, 2000u64, "Request timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($operation:expr, $attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            operation = $operation,
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying operation"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::DiaryError;
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let error = DiaryError::Validation("bad".to_string());
        crate::log_sync_start!("db", 2usize, true);
        crate::log_sync_complete!(1usize, 0usize, Duration::from_millis(5));
        crate::log_error_with_context!(&error, "context");
        crate::log_retry_attempt!("fetch_record", 1usize, 5usize, 10u64, &error);
    }
}
