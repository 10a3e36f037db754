// LogPanel - core/filter.rs
//
// Composable filter engine for received log rows.
// All active filters are AND-combined. Filter inputs that cannot be compiled
// (bad regex, unparseable time bound) are skipped, never fatal.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{LogLine, Severity};
use crate::util::constants::TIME_INPUT_FORMAT;
use crate::util::error::FilterError;
use chrono::{Duration, NaiveDateTime, Timelike};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

// =============================================================================
// Filter state (what the user typed)
// =============================================================================

/// Restricts rows by whether they span several source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultilineFilter {
    /// No restriction.
    #[default]
    Any,
    /// Only multi-line entries.
    Multiline,
    /// Only single-line entries.
    Single,
}

impl MultilineFilter {
    pub fn all() -> &'static [MultilineFilter] {
        &[
            MultilineFilter::Any,
            MultilineFilter::Multiline,
            MultilineFilter::Single,
        ]
    }

    /// Value shown in the status banner tag.
    pub fn label(&self) -> &'static str {
        match self {
            MultilineFilter::Any => "any",
            MultilineFilter::Multiline => "multiline",
            MultilineFilter::Single => "single",
        }
    }
}

/// One independently clearable part of the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Search,
    Level,
    Time,
    Regex,
    Multiline,
}

/// Complete filter state. All fields are AND-combined when applied.
///
/// Time bounds are kept as the raw input text so a half-typed value never
/// loses what the user entered; they are parsed on every application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Substring text search (case-insensitive). Empty = no filter.
    pub search: String,

    /// Exact severity to show. None = all levels.
    pub level: Option<Severity>,

    /// Lower time bound (inclusive), `YYYY-MM-DDTHH:MM`. Empty = unbounded.
    pub time_from: String,

    /// Upper time bound (inclusive), `YYYY-MM-DDTHH:MM`. Empty = unbounded.
    pub time_to: String,

    /// Regex search (case-insensitive). Empty = no filter.
    pub regex: String,

    /// Multi-line entry restriction.
    pub multiline: MultilineFilter,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.level.is_none()
            && self.time_from.is_empty()
            && self.time_to.is_empty()
            && self.regex.is_empty()
            && self.multiline == MultilineFilter::Any
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Reset a single field (the "x" on a status banner tag).
    pub fn clear_field(&mut self, field: FilterField) {
        match field {
            FilterField::Search => self.search.clear(),
            FilterField::Level => self.level = None,
            FilterField::Time => {
                self.time_from.clear();
                self.time_to.clear();
            }
            FilterField::Regex => self.regex.clear(),
            FilterField::Multiline => self.multiline = MultilineFilter::Any,
        }
    }

    /// Set the time range to the last `hours` hours ending at `now`.
    ///
    /// Both bounds are truncated to the minute, the resolution of the
    /// time inputs.
    pub fn set_last_hours(&mut self, hours: u32, now: NaiveDateTime) {
        let to = truncate_to_minute(now);
        let from = to - Duration::hours(i64::from(hours));
        self.time_from = from.format(TIME_INPUT_FORMAT).to_string();
        self.time_to = to.format(TIME_INPUT_FORMAT).to_string();
    }

    /// Tags describing the active filters, in banner order.
    pub fn active_tags(&self) -> Vec<FilterTag> {
        let mut tags = Vec::new();
        if !self.search.is_empty() {
            tags.push(FilterTag {
                field: FilterField::Search,
                label: format!("Search: \"{}\"", self.search),
            });
        }
        if let Some(level) = self.level {
            tags.push(FilterTag {
                field: FilterField::Level,
                label: format!("Level: {level}"),
            });
        }
        if !self.time_from.is_empty() || !self.time_to.is_empty() {
            let from = if self.time_from.is_empty() {
                "start"
            } else {
                &self.time_from
            };
            let to = if self.time_to.is_empty() {
                "end"
            } else {
                &self.time_to
            };
            tags.push(FilterTag {
                field: FilterField::Time,
                label: format!("Time: {from} to {to}"),
            });
        }
        if !self.regex.is_empty() {
            tags.push(FilterTag {
                field: FilterField::Regex,
                label: format!("Regex: {}", self.regex),
            });
        }
        if self.multiline != MultilineFilter::Any {
            tags.push(FilterTag {
                field: FilterField::Multiline,
                label: format!("Type: {}", self.multiline.label()),
            });
        }
        tags
    }
}

/// A removable label in the status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTag {
    pub field: FilterField,
    pub label: String,
}

/// Status banner shown while any filter is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBanner {
    pub visible: usize,
    pub total: usize,
    pub tags: Vec<FilterTag>,
}

impl FilterBanner {
    /// Build the banner, or `None` when no filter is active.
    pub fn for_state(state: &FilterState, visible: usize, total: usize) -> Option<Self> {
        if state.is_empty() {
            return None;
        }
        Some(Self {
            visible,
            total,
            tags: state.active_tags(),
        })
    }

    pub fn headline(&self) -> String {
        format!(
            "Filters Active: Showing {} of {} entries",
            self.visible, self.total
        )
    }
}

// =============================================================================
// Compiled filter (what the predicate evaluates)
// =============================================================================

/// `FilterState` with its regex and time bounds compiled once per
/// application instead of once per row.
#[derive(Debug)]
pub struct CompiledFilter {
    search_lower: String,
    level: Option<Severity>,
    time_from: Option<NaiveDateTime>,
    time_to: Option<NaiveDateTime>,
    regex: Option<Regex>,
    multiline: MultilineFilter,
    errors: Vec<FilterError>,
}

impl CompiledFilter {
    /// Compile a filter state. Never fails: inputs that do not compile are
    /// recorded in `errors()` and their predicate is skipped.
    pub fn compile(state: &FilterState) -> Self {
        let mut errors = Vec::new();

        let regex = if state.regex.is_empty() {
            None
        } else {
            match RegexBuilder::new(&state.regex).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(
                        pattern = %state.regex,
                        error = %e,
                        "Invalid regex pattern; ignoring regex filter"
                    );
                    errors.push(FilterError::InvalidRegex {
                        pattern: state.regex.clone(),
                        source: e,
                    });
                    None
                }
            }
        };

        let time_from = compile_bound("from", &state.time_from, &mut errors);
        let time_to = compile_bound("to", &state.time_to, &mut errors);

        Self {
            search_lower: state.search.to_lowercase(),
            level: state.level,
            time_from,
            time_to,
            regex,
            multiline: state.multiline,
            errors,
        }
    }

    /// Inputs that were skipped because they did not compile.
    pub fn errors(&self) -> &[FilterError] {
        &self.errors
    }

    /// The regex compile error, if the regex input is invalid.
    pub fn regex_error(&self) -> Option<&FilterError> {
        self.errors
            .iter()
            .find(|e| matches!(e, FilterError::InvalidRegex { .. }))
    }

    /// Check a single row against all active filters.
    ///
    /// `timestamp` is the row's pre-parsed timestamp; rows without one are
    /// never excluded by the time range.
    pub fn matches(&self, line: &LogLine, timestamp: Option<NaiveDateTime>) -> bool {
        // Level filter
        if let Some(level) = self.level {
            if line.level != level {
                return false;
            }
        }

        // Multiline filter
        match self.multiline {
            MultilineFilter::Multiline if !line.is_multiline => return false,
            MultilineFilter::Single if line.is_multiline => return false,
            _ => {}
        }

        // Text search (case-insensitive substring)
        if !self.search_lower.is_empty()
            && !line.content.to_lowercase().contains(&self.search_lower)
        {
            return false;
        }

        // Regex search
        if let Some(ref regex) = self.regex {
            if !regex.is_match(&line.content) {
                return false;
            }
        }

        // Time range filter (inclusive on both ends)
        if let Some(ts) = timestamp {
            if let Some(from) = self.time_from {
                if ts < from {
                    return false;
                }
            }
            if let Some(to) = self.time_to {
                if ts > to {
                    return false;
                }
            }
        }

        true
    }
}

fn compile_bound(
    field: &'static str,
    raw: &str,
    errors: &mut Vec<FilterError>,
) -> Option<NaiveDateTime> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse_time_input(raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(field, value = raw, error = %e, "Invalid time bound; ignoring it");
            errors.push(FilterError::InvalidTime {
                field,
                value: raw.to_string(),
                source: e,
            });
            None
        }
    }
}

/// Apply a compiled filter to rows, returning indices of the visible rows.
///
/// Rows keep their order; the result indexes into `rows`.
pub fn apply_filters<'a, I>(rows: I, filter: &CompiledFilter) -> Vec<usize>
where
    I: IntoIterator<Item = (&'a LogLine, Option<NaiveDateTime>)>,
{
    rows.into_iter()
        .enumerate()
        .filter(|(_, (line, ts))| filter.matches(line, *ts))
        .map(|(idx, _)| idx)
        .collect()
}

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Parse a time-bound input (`YYYY-MM-DDTHH:MM`, seconds optional, `T` or
/// space separator).
pub fn parse_time_input(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIME_INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
}

/// Find a `YYYY-MM-DD HH:MM:SS` timestamp anywhere in a timestamp cell.
pub fn parse_log_timestamp(cell: &str) -> Option<NaiveDateTime> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").ok())
        .as_ref()?;
    let found = pattern.find(cell)?;
    NaiveDateTime::parse_from_str(found.as_str(), "%Y-%m-%d %H:%M:%S").ok()
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
