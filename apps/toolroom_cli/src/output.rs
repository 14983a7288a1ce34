//! Plain-text tables and JSON for command output.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use shared::{
    domain::{CheckoutRecord, Project, Tool, Worker},
    protocol::{ActiveCheckout, DashboardSummary},
};

const NOT_AVAILABLE: &str = "N/A";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

    let mut lines = vec![
        render_line(headers.iter().copied(), &widths),
        render_line(rule.iter().map(String::as_str), &widths),
    ];
    lines.extend(
        rows.iter()
            .map(|row| render_line(row.iter().map(String::as_str), &widths)),
    );
    lines.join("\n")
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

pub fn dashboard_text(summary: &DashboardSummary) -> String {
    let mut out = render_table(
        &[
            "Total Tools",
            "Available",
            "Checked Out",
            "In Maintenance",
            "Active Projects",
            "Workers",
        ],
        &[vec![
            summary.total_tools.to_string(),
            summary.available_tools.to_string(),
            summary.checked_out_tools.to_string(),
            summary.maintenance_tools.to_string(),
            summary.active_projects.to_string(),
            summary.total_workers.to_string(),
        ]],
    );
    out.push_str("\n\nRecent checkouts\n");
    if summary.recent_checkouts.is_empty() {
        out.push_str("(none)");
        return out;
    }
    let rows: Vec<Vec<String>> = summary
        .recent_checkouts
        .iter()
        .map(|row| {
            vec![
                row.tool_name.clone(),
                row.project_name.clone(),
                row.worker_name.clone(),
                timestamp(&row.checkout.checkout_date),
            ]
        })
        .collect();
    out.push_str(&render_table(&["Tool", "Project", "Worker", "Date"], &rows));
    out
}

pub fn tools_text(tools: &[Tool]) -> String {
    let rows: Vec<Vec<String>> = tools
        .iter()
        .map(|tool| {
            vec![
                tool.id.to_string(),
                tool.name.clone(),
                tool.category.clone(),
                or_na(tool.serial_number.as_deref()),
                tool.status.to_string(),
                or_na(tool.location.as_deref()),
            ]
        })
        .collect();
    render_table(
        &["ID", "Name", "Category", "Serial Number", "Status", "Location"],
        &rows,
    )
}

pub fn projects_text(projects: &[Project]) -> String {
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|project| {
            vec![
                project.id.to_string(),
                project.name.clone(),
                project.status.to_string(),
                date(Some(project.start_date)),
                date(project.end_date),
            ]
        })
        .collect();
    render_table(&["ID", "Name", "Status", "Start Date", "End Date"], &rows)
}

pub fn workers_text(workers: &[Worker]) -> String {
    let rows: Vec<Vec<String>> = workers
        .iter()
        .map(|worker| {
            vec![
                worker.id.to_string(),
                worker.name.clone(),
                worker.email.clone(),
                worker.department.clone(),
                or_na(worker.phone.as_deref()),
            ]
        })
        .collect();
    render_table(&["ID", "Name", "Email", "Department", "Phone"], &rows)
}

pub fn active_text(rows: &[ActiveCheckout]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.checkout.id.to_string(),
                row.tool_name().to_string(),
                row.project_name().to_string(),
                row.worker_name().to_string(),
                timestamp(&row.checkout.checkout_date),
                date(row.checkout.expected_return),
            ]
        })
        .collect();
    render_table(
        &["Checkout", "Tool", "Project", "Worker", "Checkout Date", "Expected Return"],
        &rows,
    )
}

pub fn checkouts_text(records: &[CheckoutRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.id.to_string(),
                record.tool_id.to_string(),
                record.status.to_string(),
                timestamp(&record.checkout_date),
                date(record.expected_return),
                record
                    .return_date
                    .as_ref()
                    .map(timestamp)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ]
        })
        .collect();
    render_table(
        &["Checkout", "Tool", "Status", "Checked Out", "Expected Return", "Returned"],
        &rows,
    )
}
