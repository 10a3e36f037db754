// LogPanel - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation (DevWorkflow Part A Rule 2).
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogPanel operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogPanelError {
    /// Fetching or decoding a log page failed.
    Fetch(FetchError),

    /// A filter input could not be used.
    Filter(FilterError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for LogPanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogPanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

/// Errors raised while requesting a page from the log endpoint.
///
/// An endpoint that answers with `{"error": "..."}` is NOT a `FetchError`:
/// the payload decoded fine and the controller handles the error field itself.
#[derive(Debug)]
pub enum FetchError {
    /// The configured endpoint URL could not be parsed.
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// Connection, TLS, or timeout failure.
    Transport { url: String, source: ureq::Error },

    /// The response body could not be read.
    Read { url: String, source: ureq::Error },

    /// The response body was not a valid log page.
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// The fetch worker went away before answering.
    WorkerGone,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, source } => {
                write!(f, "Invalid endpoint URL '{url}': {source}")
            }
            Self::Transport { url, source } => {
                write!(f, "Request to '{url}' failed: {source}")
            }
            Self::Read { url, source } => {
                write!(f, "Could not read response from '{url}': {source}")
            }
            Self::Decode { url, source } => {
                write!(f, "Response from '{url}' is not a valid log page: {source}")
            }
            Self::WorkerGone => write!(f, "Fetch worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUrl { source, .. } => Some(source),
            Self::Transport { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::WorkerGone => None,
        }
    }
}

impl From<FetchError> for LogPanelError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Filter inputs that could not be compiled. Never fatal: the offending
/// predicate is skipped and the error is surfaced next to its input.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided regex is invalid.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// A time-range bound is not a recognised date-time.
    InvalidTime {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid filter regex '{pattern}': {source}")
            }
            Self::InvalidTime {
                field,
                value,
                source,
            } => write!(f, "Invalid {field} time '{value}': {source}"),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::InvalidTime { source, .. } => Some(source),
        }
    }
}

impl From<FilterError> for LogPanelError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogPanelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogPanel results.
pub type Result<T> = std::result::Result<T, LogPanelError>;
