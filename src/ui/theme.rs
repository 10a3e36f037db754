// LogPanel - ui/theme.rs
//
// Colour scheme, severity colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::Severity;
use egui::Color32;

/// Badge colour for a severity level.
pub fn severity_colour(severity: &Severity, dark_mode: bool) -> Color32 {
    match severity {
        Severity::Critical => Color32::from_rgb(220, 38, 38), // Red 600
        Severity::Error => Color32::from_rgb(239, 68, 68),    // Red 500
        Severity::Warning => Color32::from_rgb(217, 119, 6),  // Amber 600
        Severity::Info => {
            if dark_mode {
                Color32::from_rgb(96, 165, 250) // Blue 400
            } else {
                Color32::from_rgb(37, 99, 235) // Blue 600
            }
        }
        Severity::Debug => Color32::from_rgb(107, 114, 128), // Gray 500
        Severity::Unknown => Color32::from_rgb(75, 85, 99),  // Gray 600
    }
}

/// Subtle row tint for severities that deserve attention.
pub fn severity_bg_colour(severity: &Severity) -> Option<Color32> {
    match severity {
        Severity::Critical => Some(Color32::from_rgba_premultiplied(220, 38, 38, 25)),
        Severity::Error => Some(Color32::from_rgba_premultiplied(185, 28, 28, 20)),
        Severity::Warning => Some(Color32::from_rgba_premultiplied(217, 119, 6, 15)),
        _ => None,
    }
}

/// Foreground for row text; stays readable over the severity tints.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(243, 244, 246) // Gray 100
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Auto-refresh ON / auto-scroll ON indicator.
pub const TOGGLE_ON: Color32 = Color32::from_rgb(34, 197, 94); // Green 500

/// "Updated" toast background (alpha applied at render time).
pub const TOAST_BG: Color32 = Color32::from_rgb(22, 163, 74); // Green 600

/// Filter banner background.
pub const BANNER_BG: Color32 = Color32::from_rgba_premultiplied(37, 99, 235, 40);

/// Regex input tint while the pattern does not compile.
pub const INVALID_INPUT_BG: Color32 = Color32::from_rgba_premultiplied(220, 38, 38, 45);

/// Multiline marker in the message column.
pub const MULTILINE_MARKER: Color32 = Color32::from_rgb(147, 51, 234); // Purple 600

/// Layout constants.
pub const FILTER_PANEL_WIDTH: f32 = 280.0;
pub const ROW_HEIGHT: f32 = 22.0;
pub const LINE_COLUMN_WIDTH: f32 = 70.0;
pub const LEVEL_COLUMN_WIDTH: f32 = 80.0;
pub const TIMESTAMP_COLUMN_WIDTH: f32 = 160.0;
pub const DETAIL_WINDOW_SIZE: [f32; 2] = [720.0, 480.0];
