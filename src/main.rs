// LogPanel - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (CLI flags override file values)
// 3. Logging initialisation (debug mode support)
// 4. Endpoint client construction
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can still use
// `crate::app::...`, `crate::core::...` etc.
pub use logpanel::app;

pub use logpanel::core;
pub use logpanel::platform;
pub use logpanel::ui;
pub use logpanel::util;

use app::controller::{LogPanelController, PanelSettings};
use app::fetch::{FetchManager, HttpLogSource, LogSource};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// LogPanel - live view of a server log exposed as a paginated JSON endpoint.
///
/// Polls the endpoint on a timer, keeps the table scrolled to the newest
/// entries, and filters rows locally by text, level, time range, regex, and
/// entry type.
#[derive(Parser, Debug)]
#[command(name = "LogPanel", version, about)]
struct Cli {
    /// Log endpoint URL (overrides [endpoint] url in config.toml).
    url: Option<String>,

    /// Page to poll (1-based).
    #[arg(short = 'p', long = "page")]
    page: Option<u32>,

    /// Auto-refresh interval in milliseconds (10000-60000).
    #[arg(short = 'i', long = "interval-ms")]
    interval_ms: Option<u64>,

    /// Start with auto-refresh switched off.
    #[arg(long = "no-auto-refresh")]
    no_auto_refresh: bool,

    /// Start with auto-scroll switched off.
    #[arg(long = "no-auto-scroll")]
    no_auto_scroll: bool,

    /// Keep refreshing while the window is minimised.
    #[arg(long = "refresh-when-hidden")]
    refresh_when_hidden: bool,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Build the HTTP client for the endpoint.
fn connect(url: &str, timeout_secs: u64) -> util::error::Result<HttpLogSource> {
    let source = HttpLogSource::new(url, Duration::from_secs(timeout_secs))?;
    Ok(source)
}

/// Apply theme and body font size to the egui context.
fn configure_style(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Heading => font_size * 1.3,
                egui::TextStyle::Small => font_size * 0.75,
                _ => font_size,
            };
        }
    });
}

fn main() {
    let cli = Cli::parse();

    // Config comes first so its [logging] section can shape the subscriber.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "LogPanel starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    let Some(url) = cli.url.clone().or_else(|| config.endpoint_url.clone()) else {
        eprintln!(
            "Error: no log endpoint given. Pass a URL or set [endpoint] url in {}",
            config_path.display()
        );
        std::process::exit(2);
    };

    let settings = PanelSettings {
        page: cli.page.unwrap_or(config.page),
        refresh_interval_ms: cli.interval_ms.unwrap_or(config.refresh_interval_ms),
        only_refresh_when_active: config.only_refresh_when_active && !cli.refresh_when_hidden,
        auto_refresh_default: config.auto_refresh_default && !cli.no_auto_refresh,
        auto_scroll_to_bottom: config.auto_scroll_to_bottom && !cli.no_auto_scroll,
    };
    if let Some(ms) = cli.interval_ms {
        let clamped = core::refresh::clamp_interval(ms);
        if clamped != ms {
            tracing::warn!(requested = ms, using = clamped, "Refresh interval out of range");
        }
    }

    let source = match connect(&url, config.timeout_secs) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "Invalid log endpoint");
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let endpoint = source.describe();
    tracing::info!(%endpoint, ?settings, "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{} - {}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION,
                endpoint
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            configure_style(&cc.egui_ctx, dark_mode, font_size);

            let repaint_ctx = cc.egui_ctx.clone();
            let fetch = FetchManager::new(Arc::new(source))
                .with_waker(Arc::new(move || repaint_ctx.request_repaint()));
            let controller = LogPanelController::new(settings, Instant::now());

            Ok(Box::new(gui::LogPanelApp::new(controller, fetch, dark_mode)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LogPanel GUI: {e}");
        std::process::exit(1);
    }
}
