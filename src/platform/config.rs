// LogPanel - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation (DevWorkflow Part A Rule 13).
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogPanel configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logpanel/ or %APPDATA%\LogPanel\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation (Rule 13)
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[endpoint]` section.
    pub endpoint: EndpointSection,
    /// `[refresh]` section.
    pub refresh: RefreshSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[endpoint]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EndpointSection {
    /// Log endpoint URL.
    pub url: Option<String>,
    /// Page to poll (1-based).
    pub page: Option<u32>,
    /// Global per-request timeout.
    pub timeout_secs: Option<u64>,
}

/// `[refresh]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    pub interval_ms: Option<u64>,
    pub only_refresh_when_active: Option<bool>,
    pub auto_refresh_default: Option<bool>,
    pub auto_scroll_to_bottom: Option<bool>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Endpoint --
    pub endpoint_url: Option<String>,
    pub page: u32,
    pub timeout_secs: u64,

    // -- Refresh --
    pub refresh_interval_ms: u64,
    pub only_refresh_when_active: bool,
    pub auto_refresh_default: bool,
    pub auto_scroll_to_bottom: bool,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            page: constants::DEFAULT_PAGE,
            timeout_secs: constants::DEFAULT_HTTP_TIMEOUT_SECS,
            refresh_interval_ms: constants::DEFAULT_REFRESH_INTERVAL_MS,
            only_refresh_when_active: true,
            auto_refresh_default: true,
            auto_scroll_to_bottom: true,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Read and parse a config file. `Ok(None)` when the file does not exist.
pub fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(raw))
}

/// Load and validate the config file at `path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file cannot be read or parsed, returns defaults with a warning:
/// the application still starts but the user is informed.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw = match read_raw_config(path) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
            return (AppConfig::default(), warnings);
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Record a rejected value; the field keeps its default.
fn reject(warnings: &mut Vec<String>, field: &str, value: String, expected: String) {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value,
        expected,
    };
    warnings.push(format!("{err}. Using default."));
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Endpoint --
    if let Some(url) = raw.endpoint.url {
        match url::Url::parse(&url) {
            Ok(_) => config.endpoint_url = Some(url),
            Err(e) => reject(warnings, "endpoint.url", url, format!("an absolute URL ({e})")),
        }
    }

    if let Some(page) = raw.endpoint.page {
        if page >= 1 {
            config.page = page;
        } else {
            reject(warnings, "endpoint.page", page.to_string(), ">= 1".to_string());
        }
    }

    if let Some(secs) = raw.endpoint.timeout_secs {
        if (constants::MIN_HTTP_TIMEOUT_SECS..=constants::MAX_HTTP_TIMEOUT_SECS).contains(&secs) {
            config.timeout_secs = secs;
        } else {
            reject(
                warnings,
                "endpoint.timeout_secs",
                secs.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_HTTP_TIMEOUT_SECS,
                    constants::MAX_HTTP_TIMEOUT_SECS
                ),
            );
        }
    }

    // -- Refresh --
    // Intervals are clamped rather than rejected; the floor is also enforced
    // by the refresh state itself.
    if let Some(interval) = raw.refresh.interval_ms {
        let clamped = crate::core::refresh::clamp_interval(interval);
        if clamped != interval {
            warnings.push(format!(
                "[refresh] interval_ms = {interval} is outside {}-{}; using {clamped}.",
                constants::MIN_REFRESH_INTERVAL_MS,
                constants::MAX_REFRESH_INTERVAL_MS,
            ));
        }
        config.refresh_interval_ms = clamped;
    }
    if let Some(v) = raw.refresh.only_refresh_when_active {
        config.only_refresh_when_active = v;
    }
    if let Some(v) = raw.refresh.auto_refresh_default {
        config.auto_refresh_default = v;
    }
    if let Some(v) = raw.refresh.auto_scroll_to_bottom {
        config.auto_scroll_to_bottom = v;
    }

    // -- UI: theme --
    if let Some(theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            _ => reject(warnings, "ui.theme", theme, "\"dark\" or \"light\"".to_string()),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            reject(
                warnings,
                "ui.font_size",
                size.to_string(),
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            );
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            reject(
                warnings,
                "logging.level",
                level,
                "one of error, warn, info, debug, trace".to_string(),
            );
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file);
        }
    }

    config
}
