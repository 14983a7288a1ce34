use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CheckoutId, CheckoutRecord, CheckoutStatus, Project, ProjectId, Tool, ToolId, Worker,
    WorkerId,
};

pub const UNKNOWN_TOOL: &str = "Unknown Tool";
pub const UNKNOWN_PROJECT: &str = "Unknown Project";
pub const UNKNOWN_WORKER: &str = "Unknown Worker";

/// Body of `POST /tools` and `PUT /tools/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_due: Option<NaiveDate>,
}

/// Body of `POST /projects` and `PUT /projects/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_tools: Vec<ToolId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorker {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCheckout {
    pub tool_id: ToolId,
    pub project_id: ProjectId,
    pub worker_id: WorkerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub checkout_id: CheckoutId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckoutStatus>,
}

/// Row of `GET /checkouts/active`: the record joined with whatever the
/// backend could still resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCheckout {
    pub checkout: CheckoutRecord,
    #[serde(default)]
    pub tool: Option<Tool>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub worker: Option<Worker>,
}

impl ActiveCheckout {
    pub fn tool_name(&self) -> &str {
        self.tool
            .as_ref()
            .map(|tool| tool.name.as_str())
            .unwrap_or(UNKNOWN_TOOL)
    }

    pub fn project_name(&self) -> &str {
        self.project
            .as_ref()
            .map(|project| project.name.as_str())
            .unwrap_or(UNKNOWN_PROJECT)
    }

    pub fn worker_name(&self) -> &str {
        self.worker
            .as_ref()
            .map(|worker| worker.name.as_str())
            .unwrap_or(UNKNOWN_WORKER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCheckout {
    pub checkout: CheckoutRecord,
    pub tool_name: String,
    pub project_name: String,
    pub worker_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_tools: u64,
    pub available_tools: u64,
    pub checked_out_tools: u64,
    pub maintenance_tools: u64,
    pub active_projects: u64,
    pub total_workers: u64,
    #[serde(default)]
    pub recent_checkouts: Vec<RecentCheckout>,
}
