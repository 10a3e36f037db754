// LogPanel - tests/e2e_endpoint.rs
//
// End-to-end tests for the refresh pipeline.
//
// A throwaway HTTP server on 127.0.0.1 serves the fixture payload, so these
// tests exercise real ureq requests, real JSON decoding, the fetch worker
// thread, and the controller state changes, with no mocks in between.

use logpanel::app::controller::{LogPanelController, PanelSettings, RefreshResult};
use logpanel::app::fetch::{FetchManager, HttpLogSource, LogSource};
use logpanel::core::model::{FetchRequest, Severity};
use logpanel::core::filter::FilterField;
use logpanel::util::error::FetchError;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sample_body() -> String {
    std::fs::read_to_string(fixture("page_sample.json")).unwrap()
}

/// Canned HTTP response.
struct Reply {
    status: &'static str,
    body: String,
}

/// Serve `replies` in order, one per connection, then stop.
///
/// Returns the base URL and a channel receiving each request target
/// (`/path?query`).
fn serve(replies: Vec<Reply>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        for reply in replies {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let _ = tx.send(target);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.body.len(),
                reply.body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });

    (format!("http://{addr}/admin/logs/app.log/ajax/"), rx)
}

fn ok(body: String) -> Reply {
    Reply {
        status: "200 OK",
        body,
    }
}

fn request(seq: u64, page: u32, manual: bool) -> FetchRequest {
    FetchRequest { seq, page, manual }
}

// =============================================================================
// HttpLogSource
// =============================================================================

/// The request carries the page and a numeric cache-busting parameter.
#[test]
fn e2e_fetch_sends_page_and_cache_buster() {
    let (url, targets) = serve(vec![ok(sample_body())]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();

    let page = source.fetch(&request(1, 2, true)).unwrap();
    assert_eq!(page.log_lines.len(), 4);

    let target = targets.recv_timeout(Duration::from_secs(5)).unwrap();
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let pairs: Vec<(&str, &str)> = query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .collect();
    assert!(target.starts_with("/admin/logs/app.log/ajax/"), "{target}");
    assert!(pairs.contains(&("page", "2")), "{target}");
    let t = pairs
        .iter()
        .find(|(k, _)| *k == "t")
        .map(|(_, v)| *v)
        .expect("cache-busting parameter missing");
    assert!(t.parse::<i64>().unwrap() > 0);
}

/// The fixture payload decodes into typed rows.
#[test]
fn e2e_fetch_decodes_payload() {
    let (url, _targets) = serve(vec![ok(sample_body())]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();

    let page = source.fetch(&request(1, 1, false)).unwrap();
    assert!(page.error.is_none());
    assert_eq!(page.total_lines, 250);
    assert_eq!((page.start_line, page.end_line), (1, 4));

    let traceback = &page.log_lines[1];
    assert_eq!(traceback.level, Severity::Error);
    assert!(traceback.is_multiline);
    assert_eq!(traceback.line_count, 4);
    assert_eq!(traceback.line_range, "2-5");
    assert!(traceback.full_text().contains("KeyError"));

    assert_eq!(page.log_lines[3].timestamp, "");
}

/// A 404 with an error body is decoded, not treated as a transport failure.
#[test]
fn e2e_not_found_body_reaches_caller() {
    let (url, _targets) = serve(vec![Reply {
        status: "404 Not Found",
        body: r#"{"error": "Log file not found"}"#.to_string(),
    }]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();

    let page = source.fetch(&request(1, 1, true)).unwrap();
    assert_eq!(page.error.as_deref(), Some("Log file not found"));
    assert!(page.log_lines.is_empty());
}

/// A body that is not JSON is a decode error.
#[test]
fn e2e_garbage_body_is_decode_error() {
    let (url, _targets) = serve(vec![ok("<html>Server Error</html>".to_string())]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();

    let result = source.fetch(&request(1, 1, true));
    assert!(
        matches!(result, Err(FetchError::Decode { .. })),
        "expected Decode, got {result:?}"
    );
}

/// Nothing listening: the request fails with a transport error.
#[test]
fn e2e_unreachable_endpoint_is_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let source =
        HttpLogSource::new(&format!("http://127.0.0.1:{port}/ajax/"), Duration::from_secs(5))
            .unwrap();

    let result = source.fetch(&request(1, 1, true));
    assert!(
        matches!(result, Err(FetchError::Transport { .. })),
        "expected Transport, got {result:?}"
    );
}

// =============================================================================
// Fetch worker + controller
// =============================================================================

/// Manual refresh through the worker replaces the table; a second identical
/// payload is recognised as unchanged.
#[test]
fn e2e_refresh_round_trip_through_worker() {
    let (url, _targets) = serve(vec![ok(sample_body()), ok(sample_body())]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();
    let fetch = FetchManager::new(Arc::new(source));

    let t0 = Instant::now();
    let mut controller = LogPanelController::new(PanelSettings::default(), t0);

    let req = controller.refresh(true, t0).unwrap();
    fetch.dispatch(req);
    let outcome = fetch.wait_outcome(Duration::from_secs(10)).unwrap();
    assert_eq!(
        controller.complete_refresh(outcome, t0),
        RefreshResult::Updated
    );
    assert_eq!(controller.rows().len(), 4);
    assert!(controller.has_next_page());
    assert!(controller.take_scroll_request());

    let req = controller.refresh(true, t0 + Duration::from_millis(100)).unwrap();
    fetch.dispatch(req);
    let outcome = fetch.wait_outcome(Duration::from_secs(10)).unwrap();
    assert_eq!(
        controller.complete_refresh(outcome, t0 + Duration::from_millis(100)),
        RefreshResult::Unchanged
    );
}

/// Filters set before the data arrives apply to the fetched rows, and the
/// time range keeps rows without a timestamp.
#[test]
fn e2e_filters_apply_to_fetched_rows() {
    let (url, _targets) = serve(vec![ok(sample_body())]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();
    let fetch = FetchManager::new(Arc::new(source));

    let t0 = Instant::now();
    let mut controller = LogPanelController::new(PanelSettings::default(), t0);
    controller.filters_mut().time_from = "2024-01-15T10:01".to_string();
    controller.filters_mut().time_to = "2024-01-15T11:00".to_string();
    controller.filter_edited(logpanel::app::controller::FilterEdit::Time, t0);

    let req = controller.refresh(true, t0).unwrap();
    fetch.dispatch(req);
    let outcome = fetch.wait_outcome(Duration::from_secs(10)).unwrap();
    controller.complete_refresh(outcome, t0);

    // 10:05 entry plus the entry with no timestamp.
    assert_eq!(controller.visible_indices(), &[1, 3]);
    let banner = controller.banner().unwrap();
    assert_eq!(banner.headline(), "Filters Active: Showing 2 of 4 entries");

    controller.clear_filter(FilterField::Time);
    assert_eq!(controller.visible_count(), 4);
}

/// A failed automatic refresh backs the interval off; the table survives.
#[test]
fn e2e_failed_auto_refresh_backs_off() {
    let (url, _targets) = serve(vec![
        ok(sample_body()),
        Reply {
            status: "500 Internal Server Error",
            body: "<html>boom</html>".to_string(),
        },
    ]);
    let source = HttpLogSource::new(&url, Duration::from_secs(5)).unwrap();
    let fetch = FetchManager::new(Arc::new(source));

    let t0 = Instant::now();
    let mut controller = LogPanelController::new(PanelSettings::default(), t0);

    let req = controller.refresh(true, t0).unwrap();
    fetch.dispatch(req);
    let outcome = fetch.wait_outcome(Duration::from_secs(10)).unwrap();
    controller.complete_refresh(outcome, t0);

    let t1 = t0 + Duration::from_millis(10_000);
    let req = controller.tick(t1).expect("timer should fire");
    fetch.dispatch(req);
    let outcome = fetch.wait_outcome(Duration::from_secs(10)).unwrap();
    assert_eq!(controller.complete_refresh(outcome, t1), RefreshResult::Failed);
    assert_eq!(controller.refresh_interval_ms(), 15_000);
    assert_eq!(controller.rows().len(), 4);
}
