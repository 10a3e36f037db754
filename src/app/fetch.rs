// LogPanel - app/fetch.rs
//
// Log endpoint access: the `LogSource` seam, its HTTP implementation, and the
// background fetch worker.
//
// Architecture:
//   - `FetchManager` lives on the UI thread; each dispatched request runs on
//     its own short-lived thread, so a slow response never blocks the frame
//     loop and never delays a later request.
//   - Outcomes come back as `FetchOutcome` over an mpsc channel and are
//     drained each frame by the eframe::App.
//   - In-flight requests are not cancelled; the controller discards
//     out-of-order outcomes by sequence number.
//
// Rule 11 compliance:
//   - Every request has a global timeout (`[endpoint] timeout_secs`).
//   - Response bodies are capped at MAX_RESPONSE_BYTES.
//   - At most MAX_FETCH_OUTCOMES_PER_FRAME outcomes are drained per frame.

use crate::core::model::{FetchOutcome, FetchRequest, LogPage};
use crate::util::constants::{
    CACHE_BUST_QUERY_PARAM, MAX_FETCH_OUTCOMES_PER_FRAME, MAX_RESPONSE_BYTES, PAGE_QUERY_PARAM,
};
use crate::util::error::FetchError;
use std::sync::{mpsc, Arc};
use std::time::Duration;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use url::Url;

// =============================================================================
// LogSource
// =============================================================================

/// Anything that can serve a page of log lines.
///
/// Implementations are called from worker threads and may block.
pub trait LogSource: Send + Sync + 'static {
    /// Fetch the page described by `request`.
    fn fetch(&self, request: &FetchRequest) -> Result<LogPage, FetchError>;

    /// Human-readable location, used in log messages and the window title.
    fn describe(&self) -> String;
}

// =============================================================================
// HttpLogSource
// =============================================================================

/// JSON log endpoint reached over HTTP(S).
///
/// Each request sets `page` and a millisecond cache-busting `t` query
/// parameter, replacing any values already present in the configured URL.
/// Non-2xx responses are still decoded: the endpoint reports missing files
/// as `404 {"error": "..."}` and that body must reach the controller.
pub struct HttpLogSource {
    endpoint: Url,
    agent: ureq::Agent,
}

impl HttpLogSource {
    /// Build a source for `endpoint` with a global per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl {
            url: endpoint.to_string(),
            source: e,
        })?;

        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self { endpoint, agent })
    }

    /// URL for one request: the endpoint with `page` and `t` set.
    pub fn request_url(&self, page: u32, cache_bust_ms: i64) -> Url {
        let mut url = self.endpoint.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != PAGE_QUERY_PARAM && k != CACHE_BUST_QUERY_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(PAGE_QUERY_PARAM, &page.to_string())
            .append_pair(CACHE_BUST_QUERY_PARAM, &cache_bust_ms.to_string());
        url
    }
}

impl LogSource for HttpLogSource {
    fn fetch(&self, request: &FetchRequest) -> Result<LogPage, FetchError> {
        let cache_bust_ms = chrono::Utc::now().timestamp_millis();
        let url = self.request_url(request.page, cache_bust_ms).to_string();

        tracing::debug!(url = %url, seq = request.seq, manual = request.manual, "Fetching log page");

        let mut response = self
            .agent
            .get(url.as_str())
            .header("Accept", "application/json")
            .call()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| FetchError::Read {
                url: url.clone(),
                source: e,
            })?;

        let page: LogPage =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode { url, source: e })?;

        tracing::debug!(
            status = status.as_u16(),
            lines = page.log_lines.len(),
            total = page.total_lines,
            "Log page received"
        );
        Ok(page)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

// =============================================================================
// FetchManager
// =============================================================================

/// Called from a worker thread after an outcome has been queued.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs fetches off the UI thread and collects their outcomes.
pub struct FetchManager {
    source: Arc<dyn LogSource>,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
    waker: Option<Waker>,
}

impl FetchManager {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            source,
            outcome_tx,
            outcome_rx,
            waker: None,
        }
    }

    /// Install a callback that wakes the UI when an outcome arrives.
    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    /// Location of the underlying source.
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Start `request` on a worker thread. Returns immediately.
    pub fn dispatch(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        let waker = self.waker.clone();

        std::thread::spawn(move || {
            let result = source.fetch(&request);
            if tx.send(FetchOutcome { request, result }).is_err() {
                // UI side dropped; nothing left to notify.
                return;
            }
            if let Some(wake) = waker {
                wake();
            }
        });

        tracing::debug!(seq = request.seq, page = request.page, "Fetch dispatched");
    }

    /// Drain pending outcomes without blocking.
    pub fn poll_outcomes(&self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while outcomes.len() < MAX_FETCH_OUTCOMES_PER_FRAME {
            match self.outcome_rx.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(_) => break,
            }
        }
        outcomes
    }

    /// Block until one outcome arrives or `timeout` elapses.
    pub fn wait_outcome(&self, timeout: Duration) -> Result<FetchOutcome, FetchError> {
        self.outcome_rx
            .recv_timeout(timeout)
            .map_err(|_| FetchError::WorkerGone)
    }
}
