//! Application state owned by a single controller: fetched collections,
//! per-tab form drafts, the in-flight mutation and the pending alert.
//!
//! The store never performs I/O. Callers turn a form into a
//! [`MutationRequest`] with [`AppState::begin_submit`], run it against the
//! backend, and feed the outcome back through [`AppState::apply`], which
//! answers with the collections to re-fetch.

use chrono::NaiveDate;
use shared::{
    domain::{CheckoutId, CheckoutRecord, Project, ProjectId, Tool, ToolId, Worker, WorkerId},
    protocol::{
        ActiveCheckout, DashboardSummary, NewCheckout, NewProject, NewTool, NewWorker,
        ReturnRequest,
    },
};
use thiserror::Error;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Dashboard,
    Tools,
    Projects,
    Workers,
    ActiveCheckouts,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Dashboard,
        Resource::Tools,
        Resource::Projects,
        Resource::Workers,
        Resource::ActiveCheckouts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Tools => "tools",
            Resource::Projects => "projects",
            Resource::Workers => "workers",
            Resource::ActiveCheckouts => "active_checkouts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Tools,
    Projects,
    Workers,
    Checkout,
    Returns,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Tools,
        Tab::Projects,
        Tab::Workers,
        Tab::Checkout,
        Tab::Returns,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Tools => "Tools",
            Tab::Projects => "Projects",
            Tab::Workers => "Workers",
            Tab::Checkout => "Checkout",
            Tab::Returns => "Returns",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Tool,
    Project,
    Worker,
    Checkout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    CreateTool,
    CreateProject,
    CreateWorker,
    CreateCheckout,
    ReturnTool,
}

impl MutationKind {
    pub fn name(self) -> &'static str {
        match self {
            MutationKind::CreateTool => "create_tool",
            MutationKind::CreateProject => "create_project",
            MutationKind::CreateWorker => "create_worker",
            MutationKind::CreateCheckout => "create_checkout",
            MutationKind::ReturnTool => "return_tool",
        }
    }

    /// Collections re-fetched after the mutation succeeds.
    pub fn invalidates(self) -> &'static [Resource] {
        match self {
            MutationKind::CreateTool => &[Resource::Tools, Resource::Dashboard],
            MutationKind::CreateProject => &[Resource::Projects, Resource::Dashboard],
            MutationKind::CreateWorker => &[Resource::Workers, Resource::Dashboard],
            MutationKind::CreateCheckout | MutationKind::ReturnTool => &[
                Resource::Tools,
                Resource::ActiveCheckouts,
                Resource::Dashboard,
            ],
        }
    }

    pub fn failure_fallback(self) -> &'static str {
        match self {
            MutationKind::CreateTool => "Failed to add tool",
            MutationKind::CreateProject => "Failed to add project",
            MutationKind::CreateWorker => "Failed to add worker",
            MutationKind::CreateCheckout => "Failed to checkout tool",
            MutationKind::ReturnTool => "Failed to return tool",
        }
    }
}

impl From<FormKind> for MutationKind {
    fn from(value: FormKind) -> Self {
        match value {
            FormKind::Tool => MutationKind::CreateTool,
            FormKind::Project => MutationKind::CreateProject,
            FormKind::Worker => MutationKind::CreateWorker,
            FormKind::Checkout => MutationKind::CreateCheckout,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    CreateTool(NewTool),
    CreateProject(NewProject),
    CreateWorker(NewWorker),
    CreateCheckout(NewCheckout),
    ReturnTool(ReturnRequest),
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::CreateTool(_) => MutationKind::CreateTool,
            MutationRequest::CreateProject(_) => MutationKind::CreateProject,
            MutationRequest::CreateWorker(_) => MutationKind::CreateWorker,
            MutationRequest::CreateCheckout(_) => MutationKind::CreateCheckout,
            MutationRequest::ReturnTool(_) => MutationKind::ReturnTool,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutput {
    Tool(Tool),
    Project(Project),
    Worker(Worker),
    Checkout(CheckoutRecord),
    Returned {
        checkout_id: CheckoutId,
        message: String,
    },
}

impl MutationOutput {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationOutput::Tool(_) => MutationKind::CreateTool,
            MutationOutput::Project(_) => MutationKind::CreateProject,
            MutationOutput::Worker(_) => MutationKind::CreateWorker,
            MutationOutput::Checkout(_) => MutationKind::CreateCheckout,
            MutationOutput::Returned { .. } => MutationKind::ReturnTool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} failed: {message}", .kind.name())]
pub struct MutationFailure {
    pub kind: MutationKind,
    pub detail: Option<String>,
    pub message: String,
}

impl MutationFailure {
    pub fn from_error(kind: MutationKind, err: &ClientError) -> Self {
        Self {
            kind,
            detail: err.detail().map(str::to_string),
            message: err.to_string(),
        }
    }

    /// A failure raised before the request reached the backend.
    pub fn local(kind: MutationKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            detail: Some(message.clone()),
            message,
        }
    }

    pub fn alert_text(&self) -> String {
        let reason = self
            .detail
            .as_deref()
            .unwrap_or_else(|| self.kind.failure_fallback());
        format!("Error: {reason}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: MutationKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Loaded {
    Dashboard(DashboardSummary),
    Tools(Vec<Tool>),
    Projects(Vec<Project>),
    Workers(Vec<Worker>),
    ActiveCheckouts(Vec<ActiveCheckout>),
}

impl Loaded {
    pub fn resource(&self) -> Resource {
        match self {
            Loaded::Dashboard(_) => Resource::Dashboard,
            Loaded::Tools(_) => Resource::Tools,
            Loaded::Projects(_) => Resource::Projects,
            Loaded::Workers(_) => Resource::Workers,
            Loaded::ActiveCheckouts(_) => Resource::ActiveCheckouts,
        }
    }
}

#[derive(Debug, Clone)]
pub enum StoreEvent {
    Loaded(Loaded),
    LoadFailed { resource: Resource, message: String },
    MutationSucceeded(MutationOutput),
    MutationFailed(MutationFailure),
}

impl From<Result<MutationOutput, MutationFailure>> for StoreEvent {
    fn from(value: Result<MutationOutput, MutationFailure>) -> Self {
        match value {
            Ok(output) => StoreEvent::MutationSucceeded(output),
            Err(failure) => StoreEvent::MutationFailed(failure),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a date in YYYY-MM-DD form, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{} is still in flight", .0.name())]
    Busy(MutationKind),
    #[error(transparent)]
    Form(#[from] FormError),
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(value.to_string())
}

fn optional(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn optional_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, FormError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, value).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub serial_number: String,
    pub location: String,
}

impl ToolForm {
    pub fn to_request(&self) -> Result<NewTool, FormError> {
        Ok(NewTool {
            name: required("name", &self.name)?,
            description: optional(&self.description),
            category: required("category", &self.category)?,
            serial_number: optional(&self.serial_number),
            location: optional(&self.location),
            calibration_due: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl ProjectForm {
    pub fn to_request(&self) -> Result<NewProject, FormError> {
        let name = required("name", &self.name)?;
        let start_date = required("start_date", &self.start_date)?;
        Ok(NewProject {
            name,
            description: optional(&self.description),
            start_date: parse_date("start_date", &start_date)?,
            end_date: optional_date("end_date", &self.end_date)?,
            required_tools: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerForm {
    pub name: String,
    pub email: String,
    pub department: String,
    pub phone: String,
}

impl WorkerForm {
    pub fn to_request(&self) -> Result<NewWorker, FormError> {
        Ok(NewWorker {
            name: required("name", &self.name)?,
            email: required("email", &self.email)?,
            department: required("department", &self.department)?,
            phone: optional(&self.phone),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub tool_id: String,
    pub project_id: String,
    pub worker_id: String,
    pub expected_return: String,
}

impl CheckoutForm {
    pub fn to_request(&self) -> Result<NewCheckout, FormError> {
        Ok(NewCheckout {
            tool_id: ToolId::new(required("tool_id", &self.tool_id)?),
            project_id: ProjectId::new(required("project_id", &self.project_id)?),
            worker_id: WorkerId::new(required("worker_id", &self.worker_id)?),
            expected_return: optional_date("expected_return", &self.expected_return)?,
            notes: None,
        })
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: Tab,
    pub dashboard: Option<DashboardSummary>,
    pub tools: Vec<Tool>,
    pub projects: Vec<Project>,
    pub workers: Vec<Worker>,
    pub active_checkouts: Vec<ActiveCheckout>,
    pub tool_form: ToolForm,
    pub project_form: ProjectForm,
    pub worker_form: WorkerForm,
    pub checkout_form: CheckoutForm,
    in_flight: Option<MutationKind>,
    alert: Option<Alert>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<MutationKind> {
        self.in_flight
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Tools offered by the checkout selector.
    pub fn available_tools(&self) -> impl Iterator<Item = &Tool> + '_ {
        self.tools.iter().filter(|tool| tool.is_available())
    }

    pub fn begin_submit(&mut self, form: FormKind) -> Result<MutationRequest, StoreError> {
        self.ensure_idle()?;
        let request = match form {
            FormKind::Tool => MutationRequest::CreateTool(self.tool_form.to_request()?),
            FormKind::Project => MutationRequest::CreateProject(self.project_form.to_request()?),
            FormKind::Worker => MutationRequest::CreateWorker(self.worker_form.to_request()?),
            FormKind::Checkout => {
                MutationRequest::CreateCheckout(self.checkout_form.to_request()?)
            }
        };
        Ok(self.start(request))
    }

    pub fn begin_return(&mut self, checkout_id: CheckoutId) -> Result<MutationRequest, StoreError> {
        self.begin_return_with_notes(checkout_id, None)
    }

    pub fn begin_return_with_notes(
        &mut self,
        checkout_id: CheckoutId,
        notes: Option<String>,
    ) -> Result<MutationRequest, StoreError> {
        self.ensure_idle()?;
        Ok(self.start(MutationRequest::ReturnTool(ReturnRequest {
            checkout_id,
            notes: notes.filter(|notes| !notes.trim().is_empty()),
        })))
    }

    /// Folds a fetch or mutation outcome into the state and returns the
    /// collections that must be re-fetched as a consequence.
    pub fn apply(&mut self, event: StoreEvent) -> Vec<Resource> {
        match event {
            StoreEvent::Loaded(loaded) => {
                tracing::debug!(resource = loaded.resource().label(), "collection loaded");
                self.replace(loaded);
                Vec::new()
            }
            StoreEvent::LoadFailed { resource, message } => {
                tracing::warn!(
                    resource = resource.label(),
                    error = %message,
                    "fetch failed; keeping previous data"
                );
                Vec::new()
            }
            StoreEvent::MutationSucceeded(output) => {
                let kind = output.kind();
                self.finish(kind);
                self.merge(output);
                tracing::info!(mutation = kind.name(), "mutation succeeded");
                kind.invalidates().to_vec()
            }
            StoreEvent::MutationFailed(failure) => {
                self.finish(failure.kind);
                tracing::warn!(
                    mutation = failure.kind.name(),
                    error = %failure.message,
                    "mutation failed"
                );
                self.alert = Some(Alert {
                    kind: failure.kind,
                    message: failure.alert_text(),
                });
                Vec::new()
            }
        }
    }

    fn ensure_idle(&self) -> Result<(), StoreError> {
        match self.in_flight {
            Some(current) => Err(StoreError::Busy(current)),
            None => Ok(()),
        }
    }

    fn start(&mut self, request: MutationRequest) -> MutationRequest {
        let kind = request.kind();
        self.in_flight = Some(kind);
        self.alert = None;
        tracing::debug!(mutation = kind.name(), "mutation started");
        request
    }

    fn finish(&mut self, kind: MutationKind) {
        if self.in_flight != Some(kind) {
            tracing::debug!(
                mutation = kind.name(),
                in_flight = ?self.in_flight.map(MutationKind::name),
                "completion does not match in-flight mutation"
            );
        }
        self.in_flight = None;
    }

    fn replace(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Dashboard(summary) => self.dashboard = Some(summary),
            Loaded::Tools(tools) => self.tools = tools,
            Loaded::Projects(projects) => self.projects = projects,
            Loaded::Workers(workers) => self.workers = workers,
            Loaded::ActiveCheckouts(rows) => self.active_checkouts = rows,
        }
    }

    fn merge(&mut self, output: MutationOutput) {
        match output {
            MutationOutput::Tool(tool) => {
                self.tool_form = ToolForm::default();
                upsert(&mut self.tools, tool, |a, b| a.id == b.id);
            }
            MutationOutput::Project(project) => {
                self.project_form = ProjectForm::default();
                upsert(&mut self.projects, project, |a, b| a.id == b.id);
            }
            MutationOutput::Worker(worker) => {
                self.worker_form = WorkerForm::default();
                upsert(&mut self.workers, worker, |a, b| a.id == b.id);
            }
            MutationOutput::Checkout(_) => {
                self.checkout_form = CheckoutForm::default();
            }
            MutationOutput::Returned { checkout_id, .. } => {
                self.active_checkouts
                    .retain(|row| row.checkout.id != checkout_id);
            }
        }
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
