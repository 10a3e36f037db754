// LogPanel - ui/panels/toast.rs
//
// Transient "Updated" notice shown after an automatic refresh changed the
// table. Fully opaque for a moment, then fades out.

use crate::app::controller::LogPanelController;
use crate::ui::theme;
use std::time::Instant;

pub fn render(ctx: &egui::Context, controller: &LogPanelController, now: Instant) {
    let Some(opacity) = controller.toast_opacity(now) else {
        return;
    };

    egui::Area::new(egui::Id::new("update_toast"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 48.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(theme::TOAST_BG.gamma_multiply(opacity))
                .inner_margin(egui::Margin::same(8))
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("\u{25cf} Updated")
                            .strong()
                            .color(egui::Color32::WHITE.gamma_multiply(opacity)),
                    );
                });
        });
}
