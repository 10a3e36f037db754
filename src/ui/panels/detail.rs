// LogPanel - ui/panels/detail.rs
//
// "View Full" window showing the complete text of a long or multiline entry.

use crate::app::controller::LogPanelController;
use crate::ui::theme;

/// Render the detail window while an entry is open.
pub fn render(ctx: &egui::Context, controller: &mut LogPanelController, dark_mode: bool) {
    let Some(line) = controller.detail() else {
        return;
    };

    let mut open = true;
    let mut copy = false;
    let title = format!("Log Entry (line {})", line.line_label());

    egui::Window::new(title)
        .id(egui::Id::new("detail_window"))
        .open(&mut open)
        .default_size(theme::DETAIL_WINDOW_SIZE)
        .resizable(true)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("detail_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Level:");
                    ui.label(
                        egui::RichText::new(line.level.label())
                            .strong()
                            .color(theme::severity_colour(&line.level, dark_mode)),
                    );
                    ui.end_row();

                    if !line.timestamp.is_empty() {
                        ui.label("Timestamp:");
                        ui.label(&line.timestamp);
                        ui.end_row();
                    }

                    ui.label("Lines:");
                    ui.label(format!("{} ({} source lines)", line.line_label(), line.line_count));
                    ui.end_row();
                });

            ui.separator();
            if ui.button("Copy to clipboard").clicked() {
                copy = true;
            }
            egui::ScrollArea::both()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(line.full_text()).monospace());
                });
        });

    if copy {
        ctx.copy_text(line.full_text().to_string());
    }
    if !open {
        controller.close_detail();
    }
}
