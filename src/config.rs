//! Environment-sourced configuration.
//!
//! Built exactly once at startup and shared read-only across all sessions.
//! Missing or placeholder credentials abort startup; malformed optional
//! values are logged and replaced with their defaults.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Environment Keys
// ============================================================================

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";

const GOOGLE_API_KEY_PLACEHOLDER: &str = "your_google_api_key_here";
const TAVILY_API_KEY_PLACEHOLDER: &str = "your_tavily_api_key_here";

// ============================================================================
// SearchDepth
// ============================================================================

/// Search depth passed through to the search pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchDepth {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            _ => Err(()),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable '{0}' is required")]
    MissingCredential(&'static str),
}

// ============================================================================
// Config
// ============================================================================

/// Immutable process-wide configuration.
///
/// All sessions observe the same values; the struct is never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub tavily_api_key: String,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    pub max_content_size: usize,
    pub max_scrape_length: usize,
    pub enable_search_summarization: bool,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    /// Per-request timeout enforced at the HTTP transport, in seconds.
    pub request_timeout: u64,
    /// Timeout for outbound LLM calls, in seconds.
    pub llm_timeout: u64,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// `from_env` is a thin wrapper over this; tests supply a map-backed
    /// lookup instead of mutating process state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let google_api_key =
            required_credential(&lookup, GOOGLE_API_KEY, GOOGLE_API_KEY_PLACEHOLDER)?;
        let tavily_api_key =
            required_credential(&lookup, TAVILY_API_KEY, TAVILY_API_KEY_PLACEHOLDER)?;

        Ok(Self {
            google_api_key,
            tavily_api_key,
            search_depth: parse_or_default(&lookup, "SEARCH_DEPTH", SearchDepth::Basic),
            max_results: parse_or_default(&lookup, "MAX_RESULTS", 10),
            max_content_size: parse_or_default(&lookup, "MAX_CONTENT_SIZE", 10_000),
            max_scrape_length: parse_or_default(&lookup, "MAX_SCRAPE_LENGTH", 20_000),
            enable_search_summarization: bool_from(&lookup, "ENABLE_SEARCH_SUMMARIZATION"),
            llm_temperature: parse_or_default(&lookup, "LLM_TEMPERATURE", 0.1),
            llm_max_tokens: parse_or_default(&lookup, "LLM_MAX_TOKENS", 3_000),
            request_timeout: parse_or_default(&lookup, "REQUEST_TIMEOUT", 30),
            llm_timeout: parse_or_default(&lookup, "LLM_TIMEOUT", 60),
        })
    }

    /// Resolved settings with credentials omitted, for startup logging.
    #[must_use]
    pub fn redacted_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search_depth", self.search_depth.to_string()),
            ("max_results", self.max_results.to_string()),
            ("max_content_size", self.max_content_size.to_string()),
            ("max_scrape_length", self.max_scrape_length.to_string()),
            (
                "enable_search_summarization",
                self.enable_search_summarization.to_string(),
            ),
            ("llm_temperature", self.llm_temperature.to_string()),
            ("llm_max_tokens", self.llm_max_tokens.to_string()),
            ("request_timeout", self.request_timeout.to_string()),
            ("llm_timeout", self.llm_timeout.to_string()),
        ]
    }

    /// Log the resolved configuration with credential values redacted.
    pub fn log_resolved(&self) {
        info!("Configuration loaded:");
        for (key, value) in self.redacted_fields() {
            info!("  {key}: {value}");
        }
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

fn required_credential(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    placeholder: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if !value.is_empty() && value != placeholder => Ok(value),
        _ => Err(ConfigError::MissingCredential(key)),
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}

fn bool_from(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    matches!(lookup(key), Some(v) if v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Tests
// ============================================================================
