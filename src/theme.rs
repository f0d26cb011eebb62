//! Dark viewer theme: black panels, grey chrome, status and badge colors

use egui::Color32;

use crate::core::colormap::Rgba;
use crate::ws_state::ConnectionStatus;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(0, 0, 0);           // #000000 - matches the waterfall background
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(12, 12, 12);       // #0C0C0C
    pub const BG_HOVER: Color32 = Color32::from_rgb(24, 24, 24);          // #181818

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(255, 255, 255);   // #FFFFFF
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160); // #A0A0A0
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(80, 80, 80);        // #505050

    pub const BORDER: Color32 = Color32::from_rgb(40, 40, 40);            // #282828

    // === Connection status ===
    pub const STATUS_OK: Color32 = Color32::from_rgb(100, 200, 100);
    pub const STATUS_PENDING: Color32 = Color32::from_rgb(200, 200, 100);
    pub const STATUS_BAD: Color32 = Color32::from_rgb(200, 100, 100);
}

pub fn status_color(status: ConnectionStatus) -> Color32 {
    match status {
        ConnectionStatus::Connected => colors::STATUS_OK,
        ConnectionStatus::Connecting => colors::STATUS_PENDING,
        ConnectionStatus::Disconnected | ConnectionStatus::Error => colors::STATUS_BAD,
    }
}

pub fn to_color32(rgba: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Dark egui Visuals with greyscale widgets
pub fn minimal_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PRIMARY;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_ELEVATED;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = BG_PRIMARY;
    widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    for (state, fill, stroke) in [
        (&mut widgets.inactive, BG_ELEVATED, BORDER),
        (&mut widgets.hovered, BG_HOVER, TEXT_MUTED),
        (&mut widgets.active, BG_HOVER, TEXT_SECONDARY),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.bg_stroke = egui::Stroke::new(1.0, stroke);
        state.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    }

    visuals.selection.bg_fill = Color32::from_rgb(60, 60, 60);
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
