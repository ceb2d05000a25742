//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AdvancePolicy, DiaryConfig};
use super::secret::secret_string;
use crate::domain::errors::DiaryError;
use crate::domain::record::SortOrder;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`DiaryConfig`]
/// 4. Applies environment variable overrides (`NOTION_DIARY_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `DiaryError::Configuration` if the file cannot be read, a referenced
/// variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use notion_diary::config::loader::load_config;
///
/// let config = load_config("notion-diary.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DiaryConfig> {
    let config = read_config(path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Steps 1 to 4 of [`load_config`], leaving validation to the caller
///
/// Used when command line overrides still have to be applied on top of the
/// file before the result is checked.
///
/// # Errors
///
/// Same as [`load_config`], except that an invalid configuration is returned
/// as is.
pub fn read_config(path: impl AsRef<Path>) -> Result<DiaryConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DiaryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DiaryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_unvalidated(&contents)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses configuration text, applying substitution, overrides and validation
///
/// # Errors
///
/// Same as [`load_config`], minus the file access errors.
pub fn parse_config(contents: &str) -> Result<DiaryConfig> {
    let config = parse_unvalidated(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks a configuration, wrapping the problem as a `Configuration` error
///
/// # Errors
///
/// Returns `DiaryError::Configuration` describing the first invalid setting.
pub fn validate_config(config: &DiaryConfig) -> Result<()> {
    config.validate().map_err(|e| {
        DiaryError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

fn parse_unvalidated(contents: &str) -> Result<DiaryConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DiaryConfig = toml::from_str(&contents)
        .map_err(|e| DiaryError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DiaryError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(DiaryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        DiaryError::Configuration(format!("Invalid value '{value}' for environment variable {name}"))
    })
}

/// Applies environment variable overrides using the `NOTION_DIARY_*` prefix
///
/// Environment variables follow the pattern `NOTION_DIARY_<SECTION>_<KEY>`,
/// for example `NOTION_DIARY_NOTION_TOKEN` or `NOTION_DIARY_SYNC_CONCURRENCY`.
fn apply_env_overrides(config: &mut DiaryConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("NOTION_DIARY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = var("NOTION_DIARY_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("NOTION_DIARY_APPLICATION_DRY_RUN", &val)?;
    }

    // Notion overrides
    if let Some(val) = var("NOTION_DIARY_NOTION_TOKEN") {
        config.notion.token = secret_string(val);
    }
    if let Some(val) = var("NOTION_DIARY_NOTION_DATABASE_ID") {
        config.notion.database_id = val;
    }
    if let Some(val) = var("NOTION_DIARY_NOTION_BASE_URL") {
        config.notion.base_url = val;
    }
    if let Some(val) = var("NOTION_DIARY_NOTION_SORT") {
        config.notion.sort = match val.as_str() {
            "date" => SortOrder::DateDescending,
            "last_edited" => SortOrder::LastEditedDescending,
            other => {
                return Err(DiaryError::Configuration(format!(
                    "Invalid NOTION_DIARY_NOTION_SORT '{other}'. Must be one of: date, last_edited"
                )))
            }
        };
    }
    if let Some(val) = var("NOTION_DIARY_NOTION_RETRY_MAX_ATTEMPTS") {
        config.notion.retry.max_attempts =
            parse_override("NOTION_DIARY_NOTION_RETRY_MAX_ATTEMPTS", &val)?;
    }

    // Sync overrides
    if let Some(val) = var("NOTION_DIARY_SYNC_CONCURRENCY") {
        config.sync.concurrency = parse_override("NOTION_DIARY_SYNC_CONCURRENCY", &val)?;
    }
    if let Some(val) = var("NOTION_DIARY_SYNC_ADVANCE_POLICY") {
        config.sync.advance_policy = match val.as_str() {
            "always" => AdvancePolicy::Always,
            "hold_failed" => AdvancePolicy::HoldFailed,
            other => {
                return Err(DiaryError::Configuration(format!(
                    "Invalid NOTION_DIARY_SYNC_ADVANCE_POLICY '{other}'. Must be one of: always, hold_failed"
                )))
            }
        };
    }

    // Export and state overrides
    if let Some(val) = var("NOTION_DIARY_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(val) = var("NOTION_DIARY_STATE_PATH") {
        config.state.path = val;
    }

    // Logging overrides
    if let Some(val) = var("NOTION_DIARY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled =
            parse_override("NOTION_DIARY_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("NOTION_DIARY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
