// LogPanel - app/controller.rs
//
// The log panel controller: owns the refresh state, the filter state, and the
// row cache, and turns user actions, timer ticks, and fetch outcomes into
// state changes. Owned by the eframe::App implementation.
//
// The controller performs no I/O. Actions that need the endpoint return a
// `FetchRequest` for the caller to dispatch; the resulting `FetchOutcome` is
// fed back through `complete_refresh`. Time is passed in explicitly.

use crate::core::filter::{
    apply_filters, parse_log_timestamp, CompiledFilter, FilterBanner, FilterField, FilterState,
};
use crate::core::model::{FetchOutcome, FetchRequest, LogLine, LogPage};
use crate::core::refresh::{AutoRefresh, RefreshState};
use crate::util::constants::{
    DEFAULT_PAGE, DEFAULT_REFRESH_INTERVAL_MS, REGEX_DEBOUNCE_MS, SEARCH_DEBOUNCE_MS,
    UPDATE_TOAST_FADE_MS, UPDATE_TOAST_VISIBLE_MS,
};
use chrono::{DateTime, Local, NaiveDateTime};
use std::time::{Duration, Instant};

/// Start-up options for the controller.
#[derive(Debug, Clone)]
pub struct PanelSettings {
    /// 1-based page to poll.
    pub page: u32,
    /// Auto-refresh interval (clamped to 10-60 s).
    pub refresh_interval_ms: u64,
    /// Suspend auto-refresh while the window is hidden.
    pub only_refresh_when_active: bool,
    /// Start with auto-refresh on.
    pub auto_refresh_default: bool,
    /// Start with auto-scroll on.
    pub auto_scroll_to_bottom: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            only_refresh_when_active: true,
            auto_refresh_default: true,
            auto_scroll_to_bottom: true,
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone)]
pub struct Row {
    pub line: LogLine,
    /// Parsed from `line.timestamp`; `None` when it has no usable timestamp.
    pub timestamp: Option<NaiveDateTime>,
}

impl Row {
    pub fn new(line: LogLine) -> Self {
        let timestamp = parse_log_timestamp(&line.timestamp);
        Self { line, timestamp }
    }
}

/// Totals and bounds of the page currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_lines: u64,
    pub start_line: u64,
    pub end_line: u64,
}

impl PageInfo {
    fn of(page: &LogPage) -> Self {
        Self {
            total_lines: page.total_lines,
            start_line: page.start_line,
            end_line: page.end_line,
        }
    }
}

/// How a filter input was edited, which decides when it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEdit {
    /// Level, multiline, or apply button: apply now.
    Immediate,
    /// Time inputs: apply now and drop the active quick-range button.
    Time,
    /// Text search: debounced.
    Search,
    /// Regex: debounced.
    Regex,
}

/// What `complete_refresh` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshResult {
    /// Rows were replaced.
    Updated,
    /// Payload matched the rows already shown.
    Unchanged,
    /// The endpoint answered with an `error` field.
    EndpointError,
    /// Transport or decode failure.
    Failed,
    /// A newer request already completed; outcome dropped.
    Stale,
}

/// The log panel controller.
#[derive(Debug)]
pub struct LogPanelController {
    refresh: RefreshState,

    /// Current filter inputs. Edit through `filters_mut` and then report the
    /// edit with `filter_edited`.
    filters: FilterState,
    compiled: CompiledFilter,

    rows: Vec<Row>,
    /// Indices into `rows` that pass the filters, in table order.
    visible: Vec<usize>,
    banner: Option<FilterBanner>,

    /// Page whose rows are on screen.
    page: u32,
    /// Page requested by `go_to_page` that has not loaded yet.
    pending_page: Option<u32>,
    page_info: Option<PageInfo>,
    last_updated: Option<DateTime<Local>>,

    auto_scroll: bool,
    scroll_to_bottom: bool,

    next_seq: u64,
    last_completed_seq: u64,
    manual_in_flight: Option<u64>,

    toast_shown_at: Option<Instant>,
    filter_due: Option<Instant>,
    quick_time_hours: Option<u32>,
    filters_panel_open: bool,
    detail: Option<LogLine>,
}

impl LogPanelController {
    /// Create the controller. Starts the auto-refresh timer when enabled and
    /// requests an initial scroll to the bottom when auto-scroll is on.
    pub fn new(settings: PanelSettings, now: Instant) -> Self {
        let refresh = RefreshState::new(
            settings.refresh_interval_ms,
            settings.only_refresh_when_active,
            settings.auto_refresh_default,
            now,
        );
        let filters = FilterState::default();
        let compiled = CompiledFilter::compile(&filters);

        tracing::info!(
            page = settings.page,
            interval_ms = refresh.interval_ms(),
            auto_refresh = settings.auto_refresh_default,
            auto_scroll = settings.auto_scroll_to_bottom,
            "Log panel initialised"
        );

        Self {
            refresh,
            filters,
            compiled,
            rows: Vec::new(),
            visible: Vec::new(),
            banner: None,
            page: settings.page.max(1),
            pending_page: None,
            page_info: None,
            last_updated: None,
            auto_scroll: settings.auto_scroll_to_bottom,
            scroll_to_bottom: settings.auto_scroll_to_bottom,
            next_seq: 0,
            last_completed_seq: 0,
            manual_in_flight: None,
            toast_shown_at: None,
            filter_due: None,
            quick_time_hours: None,
            filters_panel_open: true,
            detail: None,
        }
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Re-evaluate every row against the current filter state and rebuild the
    /// status banner. Cancels any pending debounced application.
    pub fn apply_filters(&mut self) {
        self.filter_due = None;
        self.compiled = CompiledFilter::compile(&self.filters);
        self.visible = apply_filters(
            self.rows.iter().map(|r| (&r.line, r.timestamp)),
            &self.compiled,
        );
        self.banner = FilterBanner::for_state(&self.filters, self.visible.len(), self.rows.len());

        tracing::debug!(
            visible = self.visible.len(),
            total = self.rows.len(),
            "Filters applied"
        );
    }

    /// Mutable access to the filter inputs.
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Report an edit made through `filters_mut`.
    pub fn filter_edited(&mut self, edit: FilterEdit, now: Instant) {
        match edit {
            FilterEdit::Immediate => self.apply_filters(),
            FilterEdit::Time => {
                self.quick_time_hours = None;
                self.apply_filters();
            }
            FilterEdit::Search => {
                self.filter_due = Some(now + Duration::from_millis(SEARCH_DEBOUNCE_MS));
            }
            FilterEdit::Regex => {
                self.filter_due = Some(now + Duration::from_millis(REGEX_DEBOUNCE_MS));
            }
        }
    }

    /// Reset all filters and show every row.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.quick_time_hours = None;
        self.apply_filters();
    }

    /// Remove one active filter tag.
    pub fn clear_filter(&mut self, field: FilterField) {
        self.filters.clear_field(field);
        if field == FilterField::Time {
            self.quick_time_hours = None;
        }
        self.apply_filters();
    }

    /// Restrict the time range to the last `hours` hours ending at `now`.
    pub fn set_quick_time_filter(&mut self, hours: u32, now: NaiveDateTime) {
        self.filters.set_last_hours(hours, now);
        self.quick_time_hours = Some(hours);
        self.apply_filters();
    }

    pub fn toggle_filters_panel(&mut self) {
        self.filters_panel_open = !self.filters_panel_open;
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Request a refresh of the current page (or the page being switched to).
    ///
    /// Returns `None` when an automatic refresh is rate-limited. Manual
    /// refreshes always produce a request.
    pub fn refresh(&mut self, manual: bool, now: Instant) -> Option<FetchRequest> {
        if !self.refresh.try_begin(manual, now) {
            return None;
        }
        self.next_seq += 1;
        let request = FetchRequest {
            seq: self.next_seq,
            page: self.pending_page.unwrap_or(self.page),
            manual,
        };
        if manual {
            self.manual_in_flight = Some(request.seq);
        }
        tracing::debug!(seq = request.seq, page = request.page, manual, "Refresh issued");
        Some(request)
    }

    /// Advance timers: apply a due debounced filter and fire the auto-refresh
    /// timer. Returns the request to dispatch when the timer fired.
    pub fn tick(&mut self, now: Instant) -> Option<FetchRequest> {
        if matches!(self.filter_due, Some(due) if now >= due) {
            self.apply_filters();
        }
        if self.toast_shown_at.is_some() && self.toast_opacity(now).is_none() {
            self.toast_shown_at = None;
        }
        if self.refresh.poll_timer(now) {
            return self.refresh(false, now);
        }
        None
    }

    /// Apply the outcome of a previously issued request.
    pub fn complete_refresh(&mut self, outcome: FetchOutcome, now: Instant) -> RefreshResult {
        let request = outcome.request;
        if self.manual_in_flight == Some(request.seq) {
            self.manual_in_flight = None;
        }

        if request.seq <= self.last_completed_seq {
            tracing::debug!(
                seq = request.seq,
                last = self.last_completed_seq,
                "Discarding out-of-order refresh response"
            );
            return RefreshResult::Stale;
        }
        self.last_completed_seq = request.seq;

        let page = match outcome.result {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, seq = request.seq, "Error fetching log data");
                self.refresh.record_failure(request.manual);
                self.abandon_page_change(request.page);
                return RefreshResult::Failed;
            }
        };

        if let Some(ref error) = page.error {
            tracing::error!(error = %error, seq = request.seq, "Error refreshing log");
            self.abandon_page_change(request.page);
            return RefreshResult::EndpointError;
        }

        let page_changed = request.page != self.page;
        self.page = request.page;
        if self.pending_page == Some(request.page) {
            self.pending_page = None;
        }

        if !page_changed
            && self.page_info.is_some()
            && self.rows.iter().map(|r| &r.line).eq(page.log_lines.iter())
        {
            // Rows of an early page stay put while the log grows; the
            // totals still move.
            let info = PageInfo::of(&page);
            if self.page_info != Some(info) {
                tracing::debug!(
                    seq = request.seq,
                    total = info.total_lines,
                    "Log content unchanged; page bounds updated"
                );
                self.page_info = Some(info);
            } else {
                tracing::debug!(seq = request.seq, "Log content unchanged");
            }
            return RefreshResult::Unchanged;
        }

        self.replace_content(page);
        if !request.manual {
            self.toast_shown_at = Some(now);
        }
        RefreshResult::Updated
    }

    /// A request for a page other than the one on screen failed: stay put.
    fn abandon_page_change(&mut self, requested: u32) {
        if requested != self.page && self.pending_page == Some(requested) {
            tracing::warn!(
                requested,
                shown = self.page,
                "Page change failed; staying on the current page"
            );
            self.pending_page = None;
        }
    }

    fn replace_content(&mut self, page: LogPage) {
        self.page_info = Some(PageInfo::of(&page));
        self.rows = page.log_lines.into_iter().map(Row::new).collect();
        self.last_updated = Some(Local::now());
        self.detail = None;
        self.apply_filters();
        if self.auto_scroll {
            self.scroll_to_bottom = true;
        }
        tracing::info!(
            rows = self.rows.len(),
            total = page.total_lines,
            "Log content updated"
        );
    }

    // -------------------------------------------------------------------------
    // Toggles, visibility, paging
    // -------------------------------------------------------------------------

    pub fn toggle_auto_refresh(&mut self, now: Instant) -> AutoRefresh {
        self.refresh.toggle(now)
    }

    pub fn toggle_auto_scroll(&mut self) -> bool {
        self.auto_scroll = !self.auto_scroll;
        if self.auto_scroll {
            self.scroll_to_bottom = true;
        }
        self.auto_scroll
    }

    /// Report the host window's visibility (called every frame).
    pub fn set_page_visible(&mut self, visible: bool, now: Instant) {
        self.refresh.set_page_visible(visible, now);
    }

    /// Fetch another page immediately. The rows and page number on screen
    /// stay as they are until that page loads.
    pub fn go_to_page(&mut self, page: u32, now: Instant) -> Option<FetchRequest> {
        let page = page.max(1);
        if page == self.pending_page.unwrap_or(self.page) {
            return None;
        }
        tracing::info!(from = self.page, to = page, "Changing page");
        self.pending_page = (page != self.page).then_some(page);
        self.refresh(true, now)
    }

    /// Page requested but not yet loaded.
    pub fn pending_page(&self) -> Option<u32> {
        self.pending_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_info
            .is_some_and(|info| info.end_line < info.total_lines)
    }

    /// Disarm the timer and stop auto-refresh for good.
    pub fn shutdown(&mut self) {
        self.refresh.shutdown();
        self.filter_due = None;
        tracing::info!("Log panel shut down");
    }

    // -------------------------------------------------------------------------
    // Detail window
    // -------------------------------------------------------------------------

    /// Open the "View Full" window for the row at `row_idx`.
    pub fn open_detail(&mut self, row_idx: usize) {
        self.detail = self.rows.get(row_idx).map(|r| r.line.clone());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&LogLine> {
        self.detail.as_ref()
    }

    // -------------------------------------------------------------------------
    // Read access for rendering
    // -------------------------------------------------------------------------

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Indices into `rows()` that pass the filters.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn banner(&self) -> Option<&FilterBanner> {
        self.banner.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn compiled_filter(&self) -> &CompiledFilter {
        &self.compiled
    }

    pub fn quick_time_hours(&self) -> Option<u32> {
        self.quick_time_hours
    }

    pub fn filters_panel_open(&self) -> bool {
        self.filters_panel_open
    }

    pub fn auto_refresh(&self) -> AutoRefresh {
        self.refresh.mode()
    }

    pub fn refresh_interval_ms(&self) -> u64 {
        self.refresh.interval_ms()
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// Whether the manual refresh button should read "Refreshing...".
    pub fn manual_refresh_in_flight(&self) -> bool {
        self.manual_in_flight.is_some()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        self.page_info
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Consume a pending scroll-to-bottom request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    /// Opacity of the "Updated" toast, or `None` when it is gone.
    pub fn toast_opacity(&self, now: Instant) -> Option<f32> {
        let shown = self.toast_shown_at?;
        let elapsed = now.saturating_duration_since(shown).as_millis() as u64;
        if elapsed < UPDATE_TOAST_VISIBLE_MS {
            Some(1.0)
        } else if elapsed < UPDATE_TOAST_VISIBLE_MS + UPDATE_TOAST_FADE_MS {
            let faded = (elapsed - UPDATE_TOAST_VISIBLE_MS) as f32 / UPDATE_TOAST_FADE_MS as f32;
            Some(1.0 - faded)
        } else {
            None
        }
    }

    /// Earliest instant at which `tick` has work to do, for repaint scheduling.
    pub fn next_deadline(&self) -> Option<Instant> {
        let toast_end = self.toast_shown_at.map(|t| {
            t + Duration::from_millis(UPDATE_TOAST_VISIBLE_MS + UPDATE_TOAST_FADE_MS)
        });
        [self.refresh.next_tick(), self.filter_due, toast_end]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Severity;
    use crate::util::error::FetchError;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn line(number: u64, level: Severity, content: &str) -> LogLine {
        LogLine {
            number,
            level,
            timestamp: format!("2024-01-15 10:{:02}:00", number % 60),
            content: content.to_string(),
            full_content: None,
            is_long: false,
            is_multiline: false,
            line_count: 1,
            line_range: number.to_string(),
        }
    }

    fn page_of(lines: Vec<LogLine>) -> LogPage {
        let n = lines.len() as u64;
        LogPage {
            error: None,
            log_lines: lines,
            total_lines: n,
            start_line: 1,
            end_line: n,
        }
    }

    fn ok(request: FetchRequest, page: LogPage) -> FetchOutcome {
        FetchOutcome {
            request,
            result: Ok(page),
        }
    }

    fn failed(request: FetchRequest) -> FetchOutcome {
        FetchOutcome {
            request,
            result: Err(FetchError::WorkerGone),
        }
    }

    fn controller(now: Instant) -> LogPanelController {
        LogPanelController::new(PanelSettings::default(), now)
    }

    fn sample_lines() -> Vec<LogLine> {
        vec![
            line(1, Severity::Info, "service started"),
            line(2, Severity::Error, "database connection failed"),
            line(3, Severity::Warning, "slow query"),
            line(4, Severity::Error, "retry failed"),
        ]
    }

    #[test]
    fn test_manual_refresh_replaces_rows_without_toast() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        assert!(c.manual_refresh_in_flight());

        let result = c.complete_refresh(ok(req, page_of(sample_lines())), t0 + ms(50));
        assert_eq!(result, RefreshResult::Updated);
        assert!(!c.manual_refresh_in_flight());
        assert_eq!(c.rows().len(), 4);
        assert_eq!(c.visible_count(), 4);
        assert!(c.toast_opacity(t0 + ms(60)).is_none());
        assert!(c.last_updated().is_some());
        assert_eq!(c.page_info().unwrap().total_lines, 4);
    }

    #[test]
    fn test_auto_refresh_update_shows_toast_then_fades() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.tick(t0 + ms(10_000)).expect("timer should fire");
        assert!(!req.manual);

        let done = t0 + ms(10_100);
        assert_eq!(
            c.complete_refresh(ok(req, page_of(sample_lines())), done),
            RefreshResult::Updated
        );
        assert_eq!(c.toast_opacity(done), Some(1.0));
        let fading = c.toast_opacity(done + ms(2_150)).unwrap();
        assert!(fading > 0.0 && fading < 1.0);
        assert!(c.toast_opacity(done + ms(2_300)).is_none());
    }

    #[test]
    fn test_unchanged_payload_is_not_reapplied() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let first = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(first, page_of(sample_lines())), t0);
        c.take_scroll_request();

        let second = c.refresh(true, t0 + ms(100)).unwrap();
        assert_eq!(
            c.complete_refresh(ok(second, page_of(sample_lines())), t0 + ms(100)),
            RefreshResult::Unchanged
        );
        assert!(!c.take_scroll_request());
    }

    #[test]
    fn test_filters_reapplied_after_content_replace() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        c.filters_mut().level = Some(Severity::Error);
        c.filter_edited(FilterEdit::Immediate, t0);

        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);
        assert_eq!(c.visible_indices(), &[1, 3]);
        let banner = c.banner().unwrap();
        assert_eq!(banner.headline(), "Filters Active: Showing 2 of 4 entries");
    }

    #[test]
    fn test_clear_filters_restores_all_rows() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);

        c.filters_mut().search = "failed".to_string();
        c.filters_mut().level = Some(Severity::Error);
        c.filter_edited(FilterEdit::Immediate, t0);
        assert_eq!(c.visible_count(), 2);

        c.clear_filters();
        assert_eq!(c.visible_count(), 4);
        assert!(c.banner().is_none());
    }

    #[test]
    fn test_clear_single_filter_tag() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);

        c.filters_mut().search = "failed".to_string();
        c.filters_mut().level = Some(Severity::Warning);
        c.filter_edited(FilterEdit::Immediate, t0);
        assert_eq!(c.visible_count(), 0);

        c.clear_filter(FilterField::Level);
        assert_eq!(c.visible_count(), 2);
        assert_eq!(c.banner().unwrap().tags.len(), 1);
    }

    #[test]
    fn test_search_is_debounced() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);

        c.filters_mut().search = "slow".to_string();
        c.filter_edited(FilterEdit::Search, t0);
        c.tick(t0 + ms(299));
        assert_eq!(c.visible_count(), 4);

        // A newer keystroke pushes the deadline out.
        c.filters_mut().search = "slow q".to_string();
        c.filter_edited(FilterEdit::Search, t0 + ms(250));
        c.tick(t0 + ms(400));
        assert_eq!(c.visible_count(), 4);
        c.tick(t0 + ms(550));
        assert_eq!(c.visible_count(), 1);
    }

    #[test]
    fn test_regex_debounce_is_longer() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);

        c.filters_mut().regex = "^retry".to_string();
        c.filter_edited(FilterEdit::Regex, t0);
        c.tick(t0 + ms(300));
        assert_eq!(c.visible_count(), 4);
        c.tick(t0 + ms(500));
        assert_eq!(c.visible_count(), 1);
    }

    #[test]
    fn test_endpoint_error_leaves_rows_untouched() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);

        let req = c.refresh(true, t0 + ms(100)).unwrap();
        let page = LogPage {
            error: Some("Log file not found".to_string()),
            ..Default::default()
        };
        assert_eq!(
            c.complete_refresh(ok(req, page), t0 + ms(100)),
            RefreshResult::EndpointError
        );
        assert_eq!(c.rows().len(), 4);
        assert_eq!(c.refresh_interval_ms(), 10_000);
    }

    #[test]
    fn test_failed_auto_refreshes_back_off() {
        let t0 = Instant::now();
        let mut c = controller(t0);

        let first = c.tick(t0 + ms(10_000)).unwrap();
        assert_eq!(c.complete_refresh(failed(first), t0 + ms(10_050)), RefreshResult::Failed);
        assert_eq!(c.refresh_interval_ms(), 15_000);

        let second = c.tick(t0 + ms(25_000)).unwrap();
        c.complete_refresh(failed(second), t0 + ms(25_050));
        assert_eq!(c.refresh_interval_ms(), 22_500);
        assert_eq!(c.auto_refresh(), AutoRefresh::Active);
    }

    #[test]
    fn test_failed_manual_refresh_resets_button_without_backoff() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(failed(req), t0);
        assert!(!c.manual_refresh_in_flight());
        assert_eq!(c.refresh_interval_ms(), 10_000);
    }

    #[test]
    fn test_out_of_order_response_is_discarded() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let slow = c.refresh(true, t0).unwrap();
        let fast = c.refresh(true, t0 + ms(10)).unwrap();

        let newer = vec![line(1, Severity::Info, "newer")];
        let older = vec![line(1, Severity::Info, "older")];

        assert_eq!(
            c.complete_refresh(ok(fast, page_of(newer)), t0 + ms(20)),
            RefreshResult::Updated
        );
        assert_eq!(
            c.complete_refresh(ok(slow, page_of(older)), t0 + ms(30)),
            RefreshResult::Stale
        );
        assert_eq!(c.rows()[0].line.content, "newer");
        assert!(!c.manual_refresh_in_flight());
    }

    #[test]
    fn test_auto_refresh_rate_limited_after_manual() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        assert!(c.refresh(true, t0 + ms(9_000)).is_some());
        // Timer fires 1 s after the manual refresh: suppressed.
        assert!(c.tick(t0 + ms(10_000)).is_none());
    }

    #[test]
    fn test_auto_scroll_requests() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        assert!(c.take_scroll_request(), "initial scroll to bottom");
        assert!(!c.take_scroll_request());

        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);
        assert!(c.take_scroll_request());

        assert!(!c.toggle_auto_scroll());
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(vec![line(9, Severity::Info, "x")])), t0);
        assert!(!c.take_scroll_request());

        assert!(c.toggle_auto_scroll());
        assert!(c.take_scroll_request());
    }

    #[test]
    fn test_hidden_window_stops_timer() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        c.set_page_visible(false, t0 + ms(1_000));
        assert_eq!(c.auto_refresh(), AutoRefresh::Suspended);
        assert!(c.tick(t0 + ms(30_000)).is_none());

        c.set_page_visible(true, t0 + ms(30_000));
        assert!(c.tick(t0 + ms(40_000)).is_some());
    }

    #[test]
    fn test_paging() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        assert!(!c.has_previous_page());
        assert!(!c.has_next_page());

        let req = c.refresh(true, t0).unwrap();
        let mut page = page_of(sample_lines());
        page.total_lines = 40;
        c.complete_refresh(ok(req, page), t0);
        assert!(c.has_next_page());

        let req = c.go_to_page(2, t0 + ms(10)).unwrap();
        assert_eq!(req.page, 2);
        assert!(req.manual);
        assert_eq!(c.page(), 1);
        assert_eq!(c.pending_page(), Some(2));
        assert!(!c.has_previous_page());
        assert!(c.go_to_page(2, t0 + ms(20)).is_none());

        let mut second = page_of(vec![line(5, Severity::Info, "page two")]);
        second.total_lines = 40;
        second.start_line = 5;
        second.end_line = 5;
        let result = c.complete_refresh(ok(req, second), t0 + ms(30));
        assert_eq!(result, RefreshResult::Updated);
        assert_eq!(c.page(), 2);
        assert_eq!(c.pending_page(), None);
        assert!(c.has_previous_page());
        assert_eq!(c.page_info().unwrap().start_line, 5);
    }

    #[test]
    fn test_failed_page_change_stays_on_current_page() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        let mut page = page_of(sample_lines());
        page.total_lines = 40;
        c.complete_refresh(ok(req, page), t0);

        let req = c.go_to_page(2, t0 + ms(10)).unwrap();
        assert_eq!(c.complete_refresh(failed(req), t0 + ms(20)), RefreshResult::Failed);
        assert_eq!(c.page(), 1);
        assert_eq!(c.pending_page(), None);
        assert_eq!(c.rows().len(), 4);
        assert!(!c.has_previous_page());

        // The next refresh polls the page on screen again.
        let req = c.refresh(true, t0 + ms(30)).unwrap();
        assert_eq!(req.page, 1);
    }

    #[test]
    fn test_endpoint_error_on_page_change_stays_on_current_page() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);

        let req = c.go_to_page(3, t0 + ms(10)).unwrap();
        let mut missing = page_of(Vec::new());
        missing.error = Some("Page out of range".to_string());
        assert_eq!(
            c.complete_refresh(ok(req, missing), t0 + ms(20)),
            RefreshResult::EndpointError
        );
        assert_eq!(c.page(), 1);
        assert_eq!(c.pending_page(), None);
    }

    #[test]
    fn test_same_rows_with_larger_total_enables_next_page() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let lines: Vec<LogLine> = (1..=25)
            .map(|n| line(n, Severity::Info, &format!("entry {n}")))
            .collect();

        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(lines.clone())), t0);
        assert!(!c.has_next_page());
        assert!(c.take_scroll_request());
        let updated_at = c.last_updated();

        // The log grew past this page: same rows, larger total.
        let t1 = t0 + ms(10_000);
        let req = c.tick(t1).expect("timer should fire");
        let mut grown = page_of(lines);
        grown.total_lines = 100;
        assert_eq!(c.complete_refresh(ok(req, grown), t1), RefreshResult::Unchanged);

        assert_eq!(c.page_info().unwrap().total_lines, 100);
        assert!(c.has_next_page());
        assert!(c.toast_opacity(t1).is_none());
        assert!(!c.take_scroll_request());
        assert_eq!(c.last_updated(), updated_at);
    }

    #[test]
    fn test_quick_time_filter_marks_button_until_time_edit() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let now = NaiveDateTime::parse_from_str("2024-01-15 10:45:30", "%Y-%m-%d %H:%M:%S").unwrap();
        c.set_quick_time_filter(1, now);
        assert_eq!(c.quick_time_hours(), Some(1));
        assert_eq!(c.filters().time_from, "2024-01-15T09:45");

        c.filters_mut().time_to.clear();
        c.filter_edited(FilterEdit::Time, t0);
        assert_eq!(c.quick_time_hours(), None);
    }

    #[test]
    fn test_detail_window() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        let req = c.refresh(true, t0).unwrap();
        c.complete_refresh(ok(req, page_of(sample_lines())), t0);
        c.open_detail(1);
        assert_eq!(c.detail().unwrap().content, "database connection failed");
        c.close_detail();
        assert!(c.detail().is_none());
    }

    #[test]
    fn test_shutdown_stops_timer() {
        let t0 = Instant::now();
        let mut c = controller(t0);
        c.shutdown();
        assert_eq!(c.auto_refresh(), AutoRefresh::Off);
        assert!(c.tick(t0 + ms(60_000)).is_none());
        assert!(c.next_deadline().is_none());
    }
}
