//! One panel per tab. Panels only edit form drafts; anything that needs the
//! backend is handed back to the app as a [`PanelAction`].

use client_core::{
    status::StatusTone,
    store::{AppState, FormKind, Tab},
};
use eframe::egui;
use shared::domain::CheckoutId;

use crate::ui::widgets::{
    form_row, header_row, or_na, picker, stat_card, status_badge, submit_button,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Submit(FormKind),
    Return(CheckoutId),
}

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn show_tab(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelAction> {
    match state.active_tab {
        Tab::Dashboard => {
            dashboard(ui, state);
            None
        }
        Tab::Tools => tools(ui, state),
        Tab::Projects => projects(ui, state),
        Tab::Workers => workers(ui, state),
        Tab::Checkout => checkout(ui, state),
        Tab::Returns => returns(ui, state),
    }
}

fn dashboard(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Dashboard");
    let Some(summary) = &state.dashboard else {
        ui.label("Loading dashboard...");
        return;
    };

    ui.horizontal_wrapped(|ui| {
        stat_card(ui, "Total Tools", summary.total_tools, StatusTone::Neutral);
        stat_card(ui, "Available", summary.available_tools, StatusTone::Success);
        stat_card(ui, "Checked Out", summary.checked_out_tools, StatusTone::Info);
        stat_card(ui, "In Maintenance", summary.maintenance_tools, StatusTone::Warning);
        stat_card(ui, "Active Projects", summary.active_projects, StatusTone::Neutral);
        stat_card(ui, "Workers", summary.total_workers, StatusTone::Neutral);
    });

    ui.add_space(16.0);
    ui.heading("Recent Checkouts");
    if summary.recent_checkouts.is_empty() {
        ui.label("No checkouts yet.");
        return;
    }
    egui::Grid::new("recent_checkouts")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui| {
            header_row(ui, &["Tool", "Project", "Worker", "Date"]);
            for row in &summary.recent_checkouts {
                ui.label(row.tool_name.as_str());
                ui.label(row.project_name.as_str());
                ui.label(row.worker_name.as_str());
                ui.label(row.checkout.checkout_date.format(DATE_FORMAT).to_string());
                ui.end_row();
            }
        });
}

fn tools(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelAction> {
    let busy = state.is_loading();
    let mut action = None;

    ui.heading("Add New Tool");
    ui.add_enabled_ui(!busy, |ui| {
        let form = &mut state.tool_form;
        egui::Grid::new("tool_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                form_row(ui, "Name *", &mut form.name, "Cordless drill");
                form_row(ui, "Category *", &mut form.category, "Power Tools");
                form_row(ui, "Serial Number", &mut form.serial_number, "");
                form_row(ui, "Location", &mut form.location, "Storage");
                form_row(ui, "Description", &mut form.description, "");
            });
        if submit_button(ui, busy, "Add Tool", "Adding...") {
            action = Some(PanelAction::Submit(FormKind::Tool));
        }
    });

    ui.add_space(16.0);
    ui.heading(format!("Tools ({})", state.tools.len()));
    egui::Grid::new("tools_table")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui| {
            header_row(ui, &["Name", "Category", "Serial Number", "Status", "Location"]);
            for tool in &state.tools {
                ui.label(tool.name.as_str());
                ui.label(tool.category.as_str());
                ui.label(or_na(tool.serial_number.as_deref()));
                status_badge(ui, tool.status.as_str());
                ui.label(or_na(tool.location.as_deref()));
                ui.end_row();
            }
        });
    action
}

fn projects(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelAction> {
    let busy = state.is_loading();
    let mut action = None;

    ui.heading("Add New Project");
    ui.add_enabled_ui(!busy, |ui| {
        let form = &mut state.project_form;
        egui::Grid::new("project_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                form_row(ui, "Name *", &mut form.name, "Warehouse fit-out");
                form_row(ui, "Start Date *", &mut form.start_date, "YYYY-MM-DD");
                form_row(ui, "End Date", &mut form.end_date, "YYYY-MM-DD");
                form_row(ui, "Description", &mut form.description, "");
            });
        if submit_button(ui, busy, "Add Project", "Adding...") {
            action = Some(PanelAction::Submit(FormKind::Project));
        }
    });

    ui.add_space(16.0);
    ui.heading(format!("Projects ({})", state.projects.len()));
    egui::Grid::new("projects_table")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui| {
            header_row(ui, &["Name", "Status", "Start Date", "End Date", "Description"]);
            for project in &state.projects {
                ui.label(project.name.as_str());
                status_badge(ui, project.status.as_str());
                ui.label(project.start_date.format(DATE_FORMAT).to_string());
                ui.label(
                    project
                        .end_date
                        .map(|date| date.format(DATE_FORMAT).to_string())
                        .unwrap_or_else(|| or_na(None).to_string()),
                );
                ui.label(or_na(project.description.as_deref()));
                ui.end_row();
            }
        });
    action
}

fn workers(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelAction> {
    let busy = state.is_loading();
    let mut action = None;

    ui.heading("Add New Worker");
    ui.add_enabled_ui(!busy, |ui| {
        let form = &mut state.worker_form;
        egui::Grid::new("worker_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                form_row(ui, "Name *", &mut form.name, "");
                form_row(ui, "Email *", &mut form.email, "name@example.com");
                form_row(ui, "Department *", &mut form.department, "Electrical");
                form_row(ui, "Phone", &mut form.phone, "");
            });
        if submit_button(ui, busy, "Add Worker", "Adding...") {
            action = Some(PanelAction::Submit(FormKind::Worker));
        }
    });

    ui.add_space(16.0);
    ui.heading(format!("Workers ({})", state.workers.len()));
    egui::Grid::new("workers_table")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui| {
            header_row(ui, &["Name", "Email", "Department", "Phone"]);
            for worker in &state.workers {
                ui.label(worker.name.as_str());
                ui.label(worker.email.as_str());
                ui.label(worker.department.as_str());
                ui.label(or_na(worker.phone.as_deref()));
                ui.end_row();
            }
        });
    action
}

fn checkout(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelAction> {
    let busy = state.is_loading();
    let mut action = None;

    let tool_options: Vec<(String, String)> = state
        .available_tools()
        .map(|tool| (tool.id.to_string(), format!("{} ({})", tool.name, tool.category)))
        .collect();
    let project_options: Vec<(String, String)> = state
        .projects
        .iter()
        .map(|project| (project.id.to_string(), project.name.clone()))
        .collect();
    let worker_options: Vec<(String, String)> = state
        .workers
        .iter()
        .map(|worker| {
            (
                worker.id.to_string(),
                format!("{} - {}", worker.name, worker.department),
            )
        })
        .collect();

    ui.heading("Checkout Tool");
    ui.add_enabled_ui(!busy, |ui| {
        let form = &mut state.checkout_form;
        egui::Grid::new("checkout_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Tool *");
                picker(ui, "checkout_tool", &mut form.tool_id, "Select a tool", &tool_options);
                ui.end_row();
                ui.label("Project *");
                picker(
                    ui,
                    "checkout_project",
                    &mut form.project_id,
                    "Select a project",
                    &project_options,
                );
                ui.end_row();
                ui.label("Worker *");
                picker(
                    ui,
                    "checkout_worker",
                    &mut form.worker_id,
                    "Select a worker",
                    &worker_options,
                );
                ui.end_row();
                form_row(ui, "Expected Return", &mut form.expected_return, "YYYY-MM-DD");
            });
        if tool_options.is_empty() {
            ui.label("No tools are currently available.");
        }
        if submit_button(ui, busy, "Checkout Tool", "Checking Out...") {
            action = Some(PanelAction::Submit(FormKind::Checkout));
        }
    });
    action
}

fn returns(ui: &mut egui::Ui, state: &mut AppState) -> Option<PanelAction> {
    let busy = state.is_loading();
    let mut action = None;

    ui.heading(format!("Active Checkouts ({})", state.active_checkouts.len()));
    if state.active_checkouts.is_empty() {
        ui.label("Nothing is checked out.");
        return None;
    }
    egui::Grid::new("returns_table")
        .striped(true)
        .num_columns(6)
        .show(ui, |ui| {
            header_row(
                ui,
                &["Tool", "Project", "Worker", "Checkout Date", "Expected Return", "Actions"],
            );
            for row in &state.active_checkouts {
                ui.label(row.tool_name());
                ui.label(row.project_name());
                ui.label(row.worker_name());
                ui.label(row.checkout.checkout_date.format(DATE_FORMAT).to_string());
                ui.label(
                    row.checkout
                        .expected_return
                        .map(|date| date.format(DATE_FORMAT).to_string())
                        .unwrap_or_else(|| or_na(None).to_string()),
                );
                if ui.add_enabled(!busy, egui::Button::new("Return")).clicked() {
                    action = Some(PanelAction::Return(row.checkout.id.clone()));
                }
                ui.end_row();
            }
        });
    action
}
