use client_core::status::StatusTone;
use eframe::egui::{self, Color32};

pub const ERROR_FILL: Color32 = Color32::from_rgb(111, 53, 53);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(175, 96, 96);
pub const HEADER_FILL: Color32 = Color32::from_rgb(37, 99, 235);

/// Text color and a pale background of the same hue.
pub fn tone_colors(tone: StatusTone) -> (Color32, Color32) {
    let fg = match tone {
        StatusTone::Success => Color32::from_rgb(22, 101, 52),
        StatusTone::Info => Color32::from_rgb(30, 64, 175),
        StatusTone::Warning => Color32::from_rgb(154, 52, 18),
        StatusTone::Caution => Color32::from_rgb(133, 77, 14),
        StatusTone::Danger => Color32::from_rgb(153, 27, 27),
        StatusTone::Neutral => Color32::from_rgb(55, 65, 81),
    };
    (fg, lighten_color(fg, 0.82))
}

pub fn lighten_color(c: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}

pub fn error_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(ERROR_FILL)
        .stroke(egui::Stroke::new(1.0, ERROR_STROKE))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
}
