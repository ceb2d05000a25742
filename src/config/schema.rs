//! Configuration schema types
//!
//! This module defines the configuration structure for notion-diary.

use crate::config::SecretString;
use crate::domain::record::{FieldMapping, SortOrder};
use serde::{Deserialize, Serialize};

/// How watermarks move after a run that had record failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Advance every watermark to the listing fetch time
    #[default]
    Always,
    /// Never advance past the earliest edit time of a failed record
    HoldFailed,
}

/// Main notion-diary configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Notion connection settings
    pub notion: NotionConfig,

    /// Synchronization settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Exported document settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Watermark state settings
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DiaryConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.notion.validate()?;
        self.sync.validate()?;
        self.export.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (no file writes, no write-backs, no watermark save)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Retry configuration for remote calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first call included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add up to 25% random jitter to each delay
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > 20 {
            return Err(format!(
                "notion.retry.max_attempts must be between 1 and 20, got {}",
                self.max_attempts
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "notion.retry.initial_delay_ms ({}) cannot exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        if self.backoff_multiplier.is_nan() || self.backoff_multiplier < 1.0 {
            return Err("notion.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        Ok(())
    }
}

/// Property names the sync reads and writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Date property name
    #[serde(default = "default_date_field")]
    pub date: String,

    /// Number property receiving the character count
    #[serde(default = "default_word_count_field")]
    pub word_count: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            date: default_date_field(),
            word_count: default_word_count_field(),
        }
    }
}

impl FieldsConfig {
    /// Field mapping handed to the record pipeline
    pub fn mapping(&self) -> FieldMapping {
        FieldMapping {
            date: self.date.clone(),
            word_count: self.word_count.clone(),
        }
    }
}

/// Notion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token
    /// Stored securely in memory and automatically zeroized on drop
    pub token: SecretString,

    /// Database holding the diary
    pub database_id: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the Notion-Version header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Listing sort order
    #[serde(default)]
    pub sort: SortOrder,

    /// Property names
    #[serde(default)]
    pub fields: FieldsConfig,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl NotionConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.token.expose_secret().is_empty() {
            return Err("notion.token cannot be empty".to_string());
        }

        if self.database_id.trim().is_empty() {
            return Err("notion.database_id cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("notion.base_url must start with http:// or https://".to_string());
        }

        if self.api_version.trim().is_empty() {
            return Err("notion.api_version cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("notion.timeout_seconds must be > 0".to_string());
        }

        if self.fields.date.trim().is_empty() || self.fields.word_count.trim().is_empty() {
            return Err("notion.fields.date and notion.fields.word_count cannot be empty".to_string());
        }

        self.retry.validate()?;
        Ok(())
    }
}

/// Synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum records processed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Watermark advancement policy
    #[serde(default)]
    pub advance_policy: AdvancePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            advance_policy: AdvancePolicy::default(),
        }
    }
}

impl SyncConfig {
    fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 || self.concurrency > 64 {
            return Err(format!(
                "sync.concurrency must be between 1 and 64, got {}",
                self.concurrency
            ));
        }
        Ok(())
    }
}

/// Exported document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving the documents
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extension: default_extension(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.extension.is_empty()
            || !self
                .extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(format!(
                "export.extension must be non-empty and alphanumeric, got '{}'",
                self.extension
            ));
        }
        Ok(())
    }
}

/// Watermark state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path of the watermark file
    #[serde(default = "default_state_path")]
    pub path: String,

    /// Watermark names tracked and advanced together
    #[serde(default = "default_watermarks")]
    pub watermarks: Vec<String>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
            watermarks: default_watermarks(),
        }
    }
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("state.path cannot be empty".to_string());
        }
        if self.watermarks.is_empty() {
            return Err("state.watermarks must name at least one watermark".to_string());
        }
        if self.watermarks.iter().any(|w| w.trim().is_empty()) {
            return Err("state.watermarks cannot contain empty names".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_api_version() -> String {
    "2025-09-03".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_date_field() -> String {
    "Date".to_string()
}

fn default_word_count_field() -> String {
    "Word Count".to_string()
}

fn default_max_attempts() -> usize {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_concurrency() -> usize {
    3
}

fn default_output_dir() -> String {
    "./diary".to_string()
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_state_path() -> String {
    "./state.json".to_string()
}

/// Default watermark names
pub fn default_watermarks() -> Vec<String> {
    vec!["export".to_string(), "wordCount".to_string()]
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
