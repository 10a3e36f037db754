// LogPanel - ui/panels/log_table.rs
//
// Virtual-scrolling log table.
//
// Uses egui's `ScrollArea::show_rows`, which renders only the rows inside the
// viewport, so cost stays flat however many entries the page holds. Only
// rows listed in `visible_indices()` are shown; filtered-out rows keep their
// place in the cache and reappear when the filter is cleared.
//
// Columns: line | level badge | timestamp | message (+ multiline marker and
// "View Full" button for long or multiline entries).

use crate::app::controller::LogPanelController;
use crate::ui::theme;
use egui::text::{LayoutJob, TextFormat};

/// Render the table (central area).
pub fn render(ui: &mut egui::Ui, controller: &mut LogPanelController, dark_mode: bool) {
    let visible = controller.visible_count();

    if visible == 0 {
        ui.centered_and_justified(|ui| {
            if controller.page_info().is_none() {
                ui.label("Loading log...");
            } else if controller.rows().is_empty() {
                ui.label("The log is empty.");
            } else {
                ui.label("No entries match the current filters.");
            }
        });
        return;
    }

    let row_height = theme::ROW_HEIGHT;
    let mut area = egui::ScrollArea::vertical().auto_shrink([false; 2]);
    if controller.take_scroll_request() {
        let spacing = ui.spacing().item_spacing.y;
        area = area.vertical_scroll_offset((row_height + spacing) * visible as f32);
    }

    // "View Full" clicks are applied after show_rows releases the borrow of
    // the row cache.
    let mut open_detail: Option<usize> = None;

    area.show_rows(ui, row_height, visible, |ui, row_range| {
        for display_idx in row_range {
            let Some(&row_idx) = controller.visible_indices().get(display_idx) else {
                continue;
            };
            let Some(row) = controller.rows().get(row_idx) else {
                continue;
            };
            let line = &row.line;

            if let Some(bg) = theme::severity_bg_colour(&line.level) {
                let tint_rect = egui::Rect::from_min_size(
                    ui.cursor().min,
                    egui::vec2(ui.available_width(), row_height),
                );
                ui.painter().rect_filled(tint_rect, 0.0, bg);
            }

            let body_colour = theme::row_text_colour(dark_mode);
            let font = egui::FontId::monospace(12.0);

            ui.horizontal(|ui| {
                ui.set_height(row_height);

                ui.add_sized(
                    [theme::LINE_COLUMN_WIDTH, row_height],
                    egui::Label::new(
                        egui::RichText::new(line.line_label())
                            .font(font.clone())
                            .weak(),
                    ),
                );

                let sev_colour = theme::severity_colour(&line.level, dark_mode);
                ui.add_sized(
                    [theme::LEVEL_COLUMN_WIDTH, row_height],
                    egui::Label::new(
                        egui::RichText::new(line.level.label())
                            .font(font.clone())
                            .strong()
                            .color(sev_colour),
                    ),
                );

                let ts = if line.timestamp.is_empty() {
                    "-"
                } else {
                    line.timestamp.as_str()
                };
                ui.add_sized(
                    [theme::TIMESTAMP_COLUMN_WIDTH, row_height],
                    egui::Label::new(egui::RichText::new(ts).font(font.clone()).color(body_colour)),
                );

                let mut job = LayoutJob::default();
                if line.is_multiline {
                    job.append(
                        &format!("\u{21b5}{} ", line.line_count),
                        0.0,
                        TextFormat {
                            font_id: font.clone(),
                            color: theme::MULTILINE_MARKER,
                            ..Default::default()
                        },
                    );
                }
                let first_line = line.content.lines().next().unwrap_or(&line.content);
                job.append(
                    first_line,
                    0.0,
                    TextFormat {
                        font_id: font.clone(),
                        color: body_colour,
                        ..Default::default()
                    },
                );

                if line.has_full_view() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("View Full").clicked() {
                            open_detail = Some(row_idx);
                        }
                        ui.add(egui::Label::new(job).truncate())
                            .on_hover_text(line.content.as_str());
                    });
                } else {
                    ui.add(egui::Label::new(job).truncate())
                        .on_hover_text(line.content.as_str());
                }
            });
        }
    });

    if let Some(row_idx) = open_detail {
        controller.open_detail(row_idx);
    }
}
