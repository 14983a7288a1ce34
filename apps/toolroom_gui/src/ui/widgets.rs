use client_core::status::{status_label, status_tone, StatusTone};
use eframe::egui;

use crate::ui::theme::tone_colors;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Colored pill for any status string; unknown values render neutral.
pub fn status_badge(ui: &mut egui::Ui, status: &str) -> egui::Response {
    let (fg, bg) = tone_colors(status_tone(status));
    ui.label(
        egui::RichText::new(format!(" {} ", status_label(status)))
            .small()
            .strong()
            .color(fg)
            .background_color(bg),
    )
}

pub fn stat_card(ui: &mut egui::Ui, title: &str, value: u64, tone: StatusTone) {
    let (fg, bg) = tone_colors(tone);
    egui::Frame::NONE
        .fill(bg)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_min_width(140.0);
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(title).color(fg));
                ui.label(egui::RichText::new(value.to_string()).size(26.0).strong().color(fg));
            });
        });
}

/// Label plus single-line input, as one row of a two-column form grid.
pub fn form_row(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(280.0),
    );
    ui.end_row();
}

pub fn picker(
    ui: &mut egui::Ui,
    id: &str,
    selected: &mut String,
    placeholder: &str,
    options: &[(String, String)],
) {
    let selected_text = options
        .iter()
        .find(|(value, _)| value == selected)
        .map(|(_, label)| label.clone())
        .unwrap_or_else(|| placeholder.to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .width(280.0)
        .show_ui(ui, |ui| {
            for (value, label) in options {
                ui.selectable_value(selected, value.clone(), label.as_str());
            }
        });
}

pub fn submit_button(ui: &mut egui::Ui, busy: bool, idle_label: &str, busy_label: &str) -> bool {
    ui.button(if busy { busy_label } else { idle_label })
        .clicked()
}

pub fn header_row(ui: &mut egui::Ui, titles: &[&str]) {
    for title in titles {
        ui.strong(*title);
    }
    ui.end_row();
}
