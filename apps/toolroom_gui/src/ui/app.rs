use client_core::store::{AppState, Tab};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiErrorCategory, UiEvent},
        orchestration::{dispatch_backend_command, return_checkout, submit_form},
        reducer::{initial_commands, reduce, StatusLine},
    },
    ui::{
        panels::{show_tab, PanelAction},
        theme,
    },
};

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

pub struct ToolRoomApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    backend_url: String,
    state: AppState,
    status: StatusLine,
}

impl ToolRoomApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        backend_url: String,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            backend_url,
            state: AppState::new(),
            status: StatusLine {
                text: "Loading...".to_string(),
                banner: None,
            },
        };
        app.queue(initial_commands());
        app
    }

    fn queue(&mut self, commands: Vec<BackendCommand>) {
        for cmd in commands {
            if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
                break;
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let follow_up = reduce(&mut self.state, &mut self.status, event);
            self.queue(follow_up);
        }
    }

    fn handle_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Submit(form) => {
                submit_form(&self.cmd_tx, &mut self.state, form, &mut self.status)
            }
            PanelAction::Return(checkout_id) => return_checkout(
                &self.cmd_tx,
                &mut self.state,
                checkout_id,
                &mut self.status,
            ),
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::NONE
                    .fill(theme::HEADER_FILL)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Tool Room Manager")
                            .size(22.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add_enabled(!self.state.is_loading(), egui::Button::new("Refresh"))
                            .clicked()
                        {
                            self.queue(initial_commands());
                        }
                        ui.label(
                            egui::RichText::new(&self.backend_url)
                                .small()
                                .color(egui::Color32::from_gray(220)),
                        );
                    });
                });
            });

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.state.active_tab, tab, tab.label());
                }
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(banner) = self.status.banner.clone() {
                theme::error_frame().show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} error: {}",
                                err_label(banner.category()),
                                banner.message()
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status.banner = None;
                            }
                        });
                    });
                });
            }
            ui.horizontal(|ui| {
                if self.state.is_loading() {
                    ui.spinner();
                }
                ui.label(self.status.text.as_str());
            });
        });
    }

    /// Mutation failures block the window until acknowledged.
    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.state.alert().cloned() else {
            return;
        };
        let response = egui::Modal::new(egui::Id::new("mutation_alert")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.heading("Request failed");
            ui.add_space(6.0);
            ui.label(alert.message.as_str());
            ui.add_space(10.0);
            ui.button("OK").clicked()
        });
        if response.inner || response.should_close() {
            self.state.dismiss_alert();
        }
    }
}

impl eframe::App for ToolRoomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_status_bar(ctx);

        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                action = show_tab(ui, &mut self.state);
            });
        });
        if let Some(action) = action {
            self.handle_action(action);
        }

        self.show_alert(ctx);

        // Backend events arrive on a channel egui cannot observe.
        let poll = if self.state.is_loading() { 16 } else { 100 };
        ctx.request_repaint_after(std::time::Duration::from_millis(poll));
    }
}
