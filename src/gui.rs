// LogPanel - gui.rs
//
// Top-level eframe::App implementation.
// Wires the panels to the controller and drives the refresh lifecycle:
// each frame drains fetch outcomes, reports window visibility, advances the
// controller's timers, and schedules the next repaint for the earliest
// pending deadline.

use crate::app::controller::LogPanelController;
use crate::app::fetch::FetchManager;
use crate::core::model::FetchRequest;
use crate::ui;
use std::time::Instant;

/// The LogPanel application.
pub struct LogPanelApp {
    pub controller: LogPanelController,
    pub fetch: FetchManager,
    pub dark_mode: bool,
}

impl LogPanelApp {
    /// Create the app and issue the initial load.
    pub fn new(controller: LogPanelController, fetch: FetchManager, dark_mode: bool) -> Self {
        let mut app = Self {
            controller,
            fetch,
            dark_mode,
        };
        tracing::info!(source = %app.fetch.describe(), "Initial load");
        let initial = app.controller.refresh(true, Instant::now());
        app.dispatch(initial);
        app
    }

    fn dispatch(&self, request: Option<FetchRequest>) {
        if let Some(request) = request {
            self.fetch.dispatch(request);
        }
    }
}

impl eframe::App for LogPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Apply fetch outcomes that arrived since the last frame.
        for outcome in self.fetch.poll_outcomes() {
            let result = self.controller.complete_refresh(outcome, now);
            tracing::trace!(?result, "Refresh completed");
        }

        // Minimised counts as hidden.
        let minimized = ctx.input(|i| i.viewport().minimized).unwrap_or(false);
        self.controller.set_page_visible(!minimized, now);

        let due = self.controller.tick(now);
        self.dispatch(due);

        // Toolbar
        let request = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                ui.add_space(2.0);
                let request = ui::panels::toolbar::render(ui, &mut self.controller, now);
                ui.add_space(2.0);
                request
            })
            .inner;
        self.dispatch(request);

        // Filter sidebar
        if self.controller.filters_panel_open() {
            let wall_clock = chrono::Local::now().naive_local();
            egui::SidePanel::left("filters")
                .default_width(ui::theme::FILTER_PANEL_WIDTH)
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("sidebar_filters")
                        .auto_shrink([false; 2])
                        .show(ui, |ui| {
                            ui::panels::filters::render(ui, &mut self.controller, now, wall_clock);
                        });
                });
        }

        // Banner + table
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::filters::render_banner(ui, &mut self.controller);
            ui::panels::log_table::render(ui, &mut self.controller, self.dark_mode);
        });

        ui::panels::detail::render(ctx, &mut self.controller, self.dark_mode);
        ui::panels::toast::render(ctx, &self.controller, now);

        // Fetch workers wake the context on arrival; timers are covered here.
        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
        if self.controller.toast_opacity(now).is_some() {
            ctx.request_repaint();
        }
    }

    /// Called by eframe when the window is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown();
    }
}
