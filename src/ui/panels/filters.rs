// LogPanel - ui/panels/filters.rs
//
// Filter controls sidebar and the active-filter banner.
// Text and regex edits are debounced by the controller; every other control
// applies immediately.

use crate::app::controller::{FilterEdit, LogPanelController};
use crate::core::filter::{FilterField, MultilineFilter};
use crate::core::model::Severity;
use crate::ui::theme;
use crate::util::constants::QUICK_TIME_FILTER_HOURS;
use crate::util::error::FilterError;
use chrono::NaiveDateTime;
use std::time::Instant;

/// Render the filter controls.
///
/// `now` drives debouncing; `wall_clock` is the local time used by the quick
/// time-range buttons.
pub fn render(
    ui: &mut egui::Ui,
    controller: &mut LogPanelController,
    now: Instant,
    wall_clock: NaiveDateTime,
) {
    ui.heading("Filters");
    ui.separator();

    // Text search
    ui.label("Search:");
    let response = ui.add(
        egui::TextEdit::singleline(&mut controller.filters_mut().search)
            .hint_text("Text in message")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        controller.filter_edited(FilterEdit::Search, now);
    }

    ui.add_space(4.0);

    // Level
    ui.label("Level:");
    let selected = controller
        .filters()
        .level
        .map_or("All levels", |s| s.label());
    let mut level = controller.filters().level;
    egui::ComboBox::from_id_salt("level_filter")
        .selected_text(selected)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut level, None, "All levels");
            for severity in Severity::all() {
                ui.selectable_value(&mut level, Some(*severity), severity.label());
            }
        });
    if level != controller.filters().level {
        controller.filters_mut().level = level;
        controller.filter_edited(FilterEdit::Immediate, now);
    }

    ui.add_space(4.0);

    // Time range
    ui.label("From:");
    let from = ui.add(
        egui::TextEdit::singleline(&mut controller.filters_mut().time_from)
            .hint_text("YYYY-MM-DDTHH:MM")
            .desired_width(f32::INFINITY),
    );
    ui.label("To:");
    let to = ui.add(
        egui::TextEdit::singleline(&mut controller.filters_mut().time_to)
            .hint_text("YYYY-MM-DDTHH:MM")
            .desired_width(f32::INFINITY),
    );
    if from.changed() || to.changed() {
        controller.filter_edited(FilterEdit::Time, now);
    }
    for err in controller.compiled_filter().errors() {
        if let FilterError::InvalidTime { field, .. } = err {
            ui.label(
                egui::RichText::new(format!("Invalid '{field}' time; bound ignored"))
                    .small()
                    .color(ui.visuals().error_fg_color),
            )
            .on_hover_text(err.to_string());
        }
    }

    ui.horizontal_wrapped(|ui| {
        for &hours in QUICK_TIME_FILTER_HOURS {
            let active = controller.quick_time_hours() == Some(hours);
            if ui
                .selectable_label(active, quick_time_label(hours))
                .on_hover_text(format!("Show the last {hours} hour(s)"))
                .clicked()
            {
                controller.set_quick_time_filter(hours, wall_clock);
            }
        }
    });

    ui.add_space(4.0);

    // Regex
    ui.label("Regex:");
    let regex_error = controller
        .compiled_filter()
        .regex_error()
        .map(|e| e.to_string());
    let mut regex_edit = egui::TextEdit::singleline(&mut controller.filters_mut().regex)
        .hint_text("Case-insensitive pattern")
        .font(egui::TextStyle::Monospace)
        .desired_width(f32::INFINITY);
    if regex_error.is_some() {
        regex_edit = regex_edit.background_color(theme::INVALID_INPUT_BG);
    }
    let response = ui.add(regex_edit);
    if response.changed() {
        controller.filter_edited(FilterEdit::Regex, now);
    }
    if let Some(err) = regex_error {
        ui.label(
            egui::RichText::new("Invalid pattern; regex filter ignored")
                .small()
                .color(ui.visuals().error_fg_color),
        )
        .on_hover_text(err);
    }

    ui.add_space(4.0);

    // Multiline
    ui.label("Entry type:");
    let mut multiline = controller.filters().multiline;
    egui::ComboBox::from_id_salt("multiline_filter")
        .selected_text(multiline_label(multiline))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for option in MultilineFilter::all() {
                ui.selectable_value(&mut multiline, *option, multiline_label(*option));
            }
        });
    if multiline != controller.filters().multiline {
        controller.filters_mut().multiline = multiline;
        controller.filter_edited(FilterEdit::Immediate, now);
    }

    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            controller.apply_filters();
        }
        if ui
            .add_enabled(!controller.filters().is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            controller.clear_filters();
        }
    });
}

/// Render the "Filters Active" banner above the table, if any filter is set.
/// Clicking a tag's close button clears that filter alone.
pub fn render_banner(ui: &mut egui::Ui, controller: &mut LogPanelController) {
    let Some(banner) = controller.banner() else {
        return;
    };
    let headline = banner.headline();
    let tags: Vec<(FilterField, String)> = banner
        .tags
        .iter()
        .map(|t| (t.field, t.label.clone()))
        .collect();

    let mut cleared: Option<FilterField> = None;
    let mut clear_all = false;

    egui::Frame::new()
        .fill(theme::BANNER_BG)
        .inner_margin(egui::Margin::same(6))
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(headline).strong());
                for (field, label) in &tags {
                    ui.separator();
                    ui.label(label);
                    if ui
                        .small_button("\u{00d7}")
                        .on_hover_text("Remove this filter")
                        .clicked()
                    {
                        cleared = Some(*field);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Clear all").clicked() {
                        clear_all = true;
                    }
                });
            });
        });

    if clear_all {
        controller.clear_filters();
    } else if let Some(field) = cleared {
        controller.clear_filter(field);
    }
}

fn quick_time_label(hours: u32) -> String {
    match hours {
        h if h % 24 == 0 && h / 24 == 7 => "1w".to_string(),
        h if h % 24 == 0 => format!("{}d", h / 24),
        h => format!("{h}h"),
    }
}

fn multiline_label(filter: MultilineFilter) -> &'static str {
    match filter {
        MultilineFilter::Any => "All entries",
        MultilineFilter::Multiline => "Multiline only",
        MultilineFilter::Single => "Single line only",
    }
}
