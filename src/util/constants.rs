// LogPanel - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Referenced by DevWorkflow Part A Rule 11 (explicit named-constant limits).

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogPanel";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogPanel";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the optional configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Auto-refresh
// =============================================================================

/// Default auto-refresh interval.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 10_000;

/// Floor for the auto-refresh interval. Configured values below this are
/// clamped up rather than rejected.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 10_000;

/// Ceiling for the auto-refresh interval, including error backoff growth.
pub const MAX_REFRESH_INTERVAL_MS: u64 = 60_000;

/// Backoff factor applied to the interval after a failed automatic fetch,
/// expressed as a ratio (3/2 = 1.5x) so the arithmetic stays integral.
pub const BACKOFF_NUMERATOR: u64 = 3;
pub const BACKOFF_DENOMINATOR: u64 = 2;

/// Minimum spacing between two refreshes unless the refresh is manual.
pub const MIN_AUTO_REFRESH_SPACING_MS: u64 = 5_000;

/// How long the "Updated" toast stays fully visible.
pub const UPDATE_TOAST_VISIBLE_MS: u64 = 2_000;

/// Fade-out duration appended after `UPDATE_TOAST_VISIBLE_MS`.
pub const UPDATE_TOAST_FADE_MS: u64 = 300;

// =============================================================================
// Filtering
// =============================================================================

/// Quiet period before a text-search edit is applied.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Quiet period before a regex edit is applied.
pub const REGEX_DEBOUNCE_MS: u64 = 500;

/// Quick time-range buttons, in hours.
pub const QUICK_TIME_FILTER_HOURS: &[u32] = &[1, 6, 24, 168];

/// Format of time-bound inputs (matches an HTML datetime-local value).
pub const TIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

// =============================================================================
// Endpoint
// =============================================================================

/// Default page requested from the endpoint (1-based).
pub const DEFAULT_PAGE: u32 = 1;

/// Default global timeout for a single endpoint request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Bounds for the configurable request timeout.
pub const MIN_HTTP_TIMEOUT_SECS: u64 = 1;
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Maximum accepted response body size (10 MB).
pub const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Query parameter carrying the page number.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Query parameter carrying the cache-busting millisecond timestamp.
pub const CACHE_BUST_QUERY_PARAM: &str = "t";

/// Maximum fetch outcomes drained from the worker channel per frame.
pub const MAX_FETCH_OUTCOMES_PER_FRAME: usize = 32;

// =============================================================================
// UI
// =============================================================================

/// Default body font size.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum configurable font size.
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum configurable font size.
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when not specified.
pub const DEFAULT_LOG_LEVEL: &str = "info";
