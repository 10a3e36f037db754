// LogPanel - ui/panels/toolbar.rs
//
// Top toolbar: refresh controls, paging, and the log info line.
// Buttons that need the endpoint return the request for the caller to
// dispatch; this panel never talks to the fetch worker itself.

use crate::app::controller::LogPanelController;
use crate::core::model::FetchRequest;
use crate::core::refresh::AutoRefresh;
use crate::ui::theme;
use std::time::Instant;

/// Render the toolbar. Returns a request when the user asked for a fetch.
pub fn render(
    ui: &mut egui::Ui,
    controller: &mut LogPanelController,
    now: Instant,
) -> Option<FetchRequest> {
    let mut request = None;

    ui.horizontal(|ui| {
        // Manual refresh
        let in_flight = controller.manual_refresh_in_flight();
        let label = if in_flight {
            "Refreshing..."
        } else {
            "\u{27f3} Refresh"
        };
        if ui
            .add_enabled(!in_flight, egui::Button::new(label))
            .on_hover_text("Fetch the current page now")
            .clicked()
        {
            request = controller.refresh(true, now);
        }

        ui.separator();

        // Auto-refresh toggle
        let secs = controller.refresh_interval_ms() / 1000;
        let (text, colour) = match controller.auto_refresh() {
            AutoRefresh::Active => (format!("Auto-refresh: ON ({secs}s)"), Some(theme::TOGGLE_ON)),
            AutoRefresh::Suspended => (format!("Auto-refresh: PAUSED ({secs}s)"), None),
            AutoRefresh::Off => ("Auto-refresh: OFF".to_string(), None),
        };
        let mut rich = egui::RichText::new(text);
        if let Some(c) = colour {
            rich = rich.color(c);
        }
        let hover = if controller.auto_refresh() == AutoRefresh::Suspended {
            "Paused while the window is hidden"
        } else {
            "Toggle automatic refresh"
        };
        if ui.button(rich).on_hover_text(hover).clicked() {
            controller.toggle_auto_refresh(now);
        }

        // Auto-scroll toggle
        let scroll_text = if controller.auto_scroll() {
            egui::RichText::new("Auto-scroll: ON").color(theme::TOGGLE_ON)
        } else {
            egui::RichText::new("Auto-scroll: OFF")
        };
        if ui.button(scroll_text).clicked() {
            controller.toggle_auto_scroll();
        }

        // Filters panel toggle
        let filters_text = if controller.filters_panel_open() {
            "Hide Filters"
        } else {
            "Show Filters"
        };
        if ui.button(filters_text).clicked() {
            controller.toggle_filters_panel();
        }

        ui.separator();

        // Paging
        if ui
            .add_enabled(controller.has_previous_page(), egui::Button::new("\u{2190} Prev"))
            .clicked()
        {
            request = controller.go_to_page(controller.page() - 1, now);
        }
        match controller.pending_page() {
            Some(pending) => ui.label(format!("Page {} (loading {})", controller.page(), pending)),
            None => ui.label(format!("Page {}", controller.page())),
        };
        if ui
            .add_enabled(controller.has_next_page(), egui::Button::new("Next \u{2192}"))
            .clicked()
        {
            request = controller.go_to_page(controller.page() + 1, now);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if let Some(updated) = controller.last_updated() {
                ui.label(format!("Last updated: {}", updated.format("%H:%M:%S")));
                ui.separator();
            }
            ui.label(log_info(controller));
        });
    });

    request
}

/// "Lines X-Y of Z" summary for the page on screen.
fn log_info(controller: &LogPanelController) -> String {
    match controller.page_info() {
        Some(info) if info.total_lines > 0 => format!(
            "Lines {}-{} of {}",
            info.start_line, info.end_line, info.total_lines
        ),
        Some(_) => "Log is empty".to_string(),
        None => "Waiting for first refresh".to_string(),
    }
}
