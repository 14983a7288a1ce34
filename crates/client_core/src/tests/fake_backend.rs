//! In-process stand-in for the tool room REST backend. It keeps the same
//! business rules (checkout eligibility, status flips on checkout/return),
//! records every request, and can be told to fail or stall the next call to
//! a route.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::{
    domain::{
        CheckoutId, CheckoutRecord, CheckoutStatus, Project, ProjectId, ProjectStatus, Tool,
        ToolId, ToolStatus, Worker, WorkerId,
    },
    protocol::{
        ActiveCheckout, CheckoutsQuery, DashboardSummary, MessageResponse, NewCheckout,
        NewProject, NewTool, NewWorker, RecentCheckout, ReturnRequest, UNKNOWN_PROJECT,
        UNKNOWN_TOOL, UNKNOWN_WORKER,
    },
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api::HttpToolRoomClient, config::Settings};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Injected {
    Fail(StatusCode, Value),
    Stall(Duration),
}

#[derive(Default)]
struct FakeDb {
    tools: Vec<Tool>,
    projects: Vec<Project>,
    workers: Vec<Worker>,
    checkouts: Vec<CheckoutRecord>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    db: Arc<Mutex<FakeDb>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    injected: Arc<Mutex<HashMap<(Method, String), Injected>>>,
}

type HandlerError = (StatusCode, Json<Value>);
type HandlerResult<T> = Result<Json<T>, HandlerError>;

fn detail(status: StatusCode, text: &str) -> HandlerError {
    (status, Json(json!({ "detail": text })))
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, HandlerError> {
    serde_json::from_value(body).map_err(|err| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [{ "loc": ["body"], "msg": err.to_string(), "type": "value_error" }]
            })),
        )
    })
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl FakeBackend {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn clear_requests(&self) {
        self.requests.lock().await.clear();
    }

    /// `(METHOD, path)` pairs, which is what most assertions care about.
    pub async fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }

    pub async fn fail_next(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.injected
            .lock()
            .await
            .insert((method, path.to_string()), Injected::Fail(status, body));
    }

    pub async fn stall_next(&self, method: Method, path: &str, delay: Duration) {
        self.injected
            .lock()
            .await
            .insert((method, path.to_string()), Injected::Stall(delay));
    }

    pub async fn seed_tool(&self, name: &str, category: &str) -> Tool {
        let tool = Tool {
            id: ToolId::new(new_id()),
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            serial_number: None,
            status: ToolStatus::Available,
            image_url: None,
            calibration_due: None,
            location: Some("Storage".to_string()),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        self.db.lock().await.tools.push(tool.clone());
        tool
    }

    pub async fn seed_project(&self, name: &str, status: ProjectStatus) -> Project {
        let project = Project {
            id: ProjectId::new(new_id()),
            name: name.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            end_date: None,
            status,
            required_tools: Vec::new(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        self.db.lock().await.projects.push(project.clone());
        project
    }

    pub async fn seed_worker(&self, name: &str) -> Worker {
        let worker = Worker {
            id: WorkerId::new(new_id()),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            department: "Site Crew".to_string(),
            phone: None,
            created_at: Some(Utc::now()),
        };
        self.db.lock().await.workers.push(worker.clone());
        worker
    }

    /// Active checkout with a fixed date, so ordering assertions do not
    /// depend on the clock. The tool is flipped to checked out.
    pub async fn seed_checkout(
        &self,
        tool_id: &ToolId,
        project_id: &ProjectId,
        worker_id: &WorkerId,
        checkout_date: DateTime<Utc>,
    ) -> CheckoutRecord {
        let record = CheckoutRecord {
            id: CheckoutId::new(new_id()),
            tool_id: tool_id.clone(),
            project_id: project_id.clone(),
            worker_id: worker_id.clone(),
            checkout_date,
            expected_return: None,
            return_date: None,
            status: CheckoutStatus::Active,
            notes: None,
        };
        let mut db = self.db.lock().await;
        db.checkouts.push(record.clone());
        if let Some(tool) = db.tools.iter_mut().find(|tool| &tool.id == tool_id) {
            tool.status = ToolStatus::CheckedOut;
        }
        record
    }

    pub async fn set_tool_status(&self, tool_id: &ToolId, status: ToolStatus) {
        let mut db = self.db.lock().await;
        if let Some(tool) = db.tools.iter_mut().find(|tool| &tool.id == tool_id) {
            tool.status = status;
        }
    }

    async fn record(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<(), HandlerError> {
        self.requests.lock().await.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body,
        });
        let injected = self.injected.lock().await.remove(&(method, path));
        match injected {
            Some(Injected::Fail(status, body)) => Err((status, Json(body))),
            Some(Injected::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

async fn dashboard(State(backend): State<FakeBackend>) -> HandlerResult<DashboardSummary> {
    backend
        .record(Method::GET, "/api/dashboard".into(), None)
        .await?;
    let db = backend.db.lock().await;
    let count_tools =
        |status: ToolStatus| db.tools.iter().filter(|t| t.status == status).count() as u64;

    let mut recent: Vec<&CheckoutRecord> = db.checkouts.iter().collect();
    recent.sort_by(|a, b| b.checkout_date.cmp(&a.checkout_date));
    let recent_checkouts = recent
        .into_iter()
        .take(5)
        .map(|checkout| RecentCheckout {
            checkout: checkout.clone(),
            tool_name: db
                .tools
                .iter()
                .find(|t| t.id == checkout.tool_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
            project_name: db
                .projects
                .iter()
                .find(|p| p.id == checkout.project_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
            worker_name: db
                .workers
                .iter()
                .find(|w| w.id == checkout.worker_id)
                .map(|w| w.name.clone())
                .unwrap_or_else(|| UNKNOWN_WORKER.to_string()),
        })
        .collect();

    Ok(Json(DashboardSummary {
        total_tools: db.tools.len() as u64,
        available_tools: count_tools(ToolStatus::Available),
        checked_out_tools: count_tools(ToolStatus::CheckedOut),
        maintenance_tools: count_tools(ToolStatus::InMaintenance),
        active_projects: db
            .projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count() as u64,
        total_workers: db.workers.len() as u64,
        recent_checkouts,
    }))
}

async fn list_tools(State(backend): State<FakeBackend>) -> HandlerResult<Vec<Tool>> {
    backend.record(Method::GET, "/api/tools".into(), None).await?;
    Ok(Json(backend.db.lock().await.tools.clone()))
}

async fn create_tool(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> HandlerResult<Tool> {
    backend
        .record(Method::POST, "/api/tools".into(), Some(body.clone()))
        .await?;
    let new: NewTool = parse_body(body)?;
    let tool = Tool {
        id: ToolId::new(new_id()),
        name: new.name,
        description: new.description,
        category: new.category,
        serial_number: new.serial_number,
        status: ToolStatus::Available,
        image_url: None,
        calibration_due: new.calibration_due,
        location: Some(new.location.unwrap_or_else(|| "Storage".to_string())),
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    };
    backend.db.lock().await.tools.push(tool.clone());
    Ok(Json(tool))
}

async fn get_tool(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
) -> HandlerResult<Tool> {
    backend
        .record(Method::GET, format!("/api/tools/{id}"), None)
        .await?;
    let db = backend.db.lock().await;
    db.tools
        .iter()
        .find(|tool| tool.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Tool not found"))
}

async fn update_tool(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult<Tool> {
    backend
        .record(Method::PUT, format!("/api/tools/{id}"), Some(body.clone()))
        .await?;
    let update: NewTool = parse_body(body)?;
    let mut db = backend.db.lock().await;
    let tool = db
        .tools
        .iter_mut()
        .find(|tool| tool.id.as_str() == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Tool not found"))?;
    tool.name = update.name;
    tool.description = update.description;
    tool.category = update.category;
    tool.serial_number = update.serial_number;
    tool.location = update.location;
    tool.calibration_due = update.calibration_due;
    tool.updated_at = Some(Utc::now());
    Ok(Json(tool.clone()))
}

async fn delete_tool(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
) -> HandlerResult<MessageResponse> {
    backend
        .record(Method::DELETE, format!("/api/tools/{id}"), None)
        .await?;
    let mut db = backend.db.lock().await;
    let before = db.tools.len();
    db.tools.retain(|tool| tool.id.as_str() != id);
    if db.tools.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Tool not found"));
    }
    Ok(Json(MessageResponse {
        message: "Tool deleted successfully".to_string(),
    }))
}

async fn list_projects(State(backend): State<FakeBackend>) -> HandlerResult<Vec<Project>> {
    backend
        .record(Method::GET, "/api/projects".into(), None)
        .await?;
    Ok(Json(backend.db.lock().await.projects.clone()))
}

async fn create_project(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> HandlerResult<Project> {
    backend
        .record(Method::POST, "/api/projects".into(), Some(body.clone()))
        .await?;
    let new: NewProject = parse_body(body)?;
    let project = Project {
        id: ProjectId::new(new_id()),
        name: new.name,
        description: new.description,
        start_date: new.start_date,
        end_date: new.end_date,
        status: ProjectStatus::Planning,
        required_tools: new.required_tools,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    };
    backend.db.lock().await.projects.push(project.clone());
    Ok(Json(project))
}

async fn get_project(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
) -> HandlerResult<Project> {
    backend
        .record(Method::GET, format!("/api/projects/{id}"), None)
        .await?;
    let db = backend.db.lock().await;
    db.projects
        .iter()
        .find(|project| project.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Project not found"))
}

async fn update_project(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult<Project> {
    backend
        .record(Method::PUT, format!("/api/projects/{id}"), Some(body.clone()))
        .await?;
    let update: NewProject = parse_body(body)?;
    let mut db = backend.db.lock().await;
    let project = db
        .projects
        .iter_mut()
        .find(|project| project.id.as_str() == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Project not found"))?;
    project.name = update.name;
    project.description = update.description;
    project.start_date = update.start_date;
    project.end_date = update.end_date;
    project.required_tools = update.required_tools;
    project.updated_at = Some(Utc::now());
    Ok(Json(project.clone()))
}

async fn list_workers(State(backend): State<FakeBackend>) -> HandlerResult<Vec<Worker>> {
    backend
        .record(Method::GET, "/api/workers".into(), None)
        .await?;
    Ok(Json(backend.db.lock().await.workers.clone()))
}

async fn create_worker(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> HandlerResult<Worker> {
    backend
        .record(Method::POST, "/api/workers".into(), Some(body.clone()))
        .await?;
    let new: NewWorker = parse_body(body)?;
    let worker = Worker {
        id: WorkerId::new(new_id()),
        name: new.name,
        email: new.email,
        department: new.department,
        phone: new.phone,
        created_at: Some(Utc::now()),
    };
    backend.db.lock().await.workers.push(worker.clone());
    Ok(Json(worker))
}

async fn get_worker(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
) -> HandlerResult<Worker> {
    backend
        .record(Method::GET, format!("/api/workers/{id}"), None)
        .await?;
    let db = backend.db.lock().await;
    db.workers
        .iter()
        .find(|worker| worker.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Worker not found"))
}

async fn list_active_checkouts(
    State(backend): State<FakeBackend>,
) -> HandlerResult<Vec<ActiveCheckout>> {
    backend
        .record(Method::GET, "/api/checkouts/active".into(), None)
        .await?;
    let db = backend.db.lock().await;
    let rows = db
        .checkouts
        .iter()
        .filter(|checkout| checkout.status == CheckoutStatus::Active)
        .map(|checkout| ActiveCheckout {
            checkout: checkout.clone(),
            tool: db.tools.iter().find(|t| t.id == checkout.tool_id).cloned(),
            project: db
                .projects
                .iter()
                .find(|p| p.id == checkout.project_id)
                .cloned(),
            worker: db
                .workers
                .iter()
                .find(|w| w.id == checkout.worker_id)
                .cloned(),
        })
        .collect();
    Ok(Json(rows))
}

async fn list_checkouts(
    State(backend): State<FakeBackend>,
    Query(query): Query<CheckoutsQuery>,
) -> HandlerResult<Vec<CheckoutRecord>> {
    let path = match &query.status {
        Some(status) => format!("/api/checkouts?status={status}"),
        None => "/api/checkouts".to_string(),
    };
    backend.record(Method::GET, path, None).await?;
    let db = backend.db.lock().await;
    let records = db
        .checkouts
        .iter()
        .filter(|checkout| {
            query
                .status
                .as_ref()
                .map_or(true, |status| &checkout.status == status)
        })
        .cloned()
        .collect();
    Ok(Json(records))
}

async fn create_checkout(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> HandlerResult<CheckoutRecord> {
    backend
        .record(Method::POST, "/api/checkout".into(), Some(body.clone()))
        .await?;
    let new: NewCheckout = parse_body(body)?;
    let mut db = backend.db.lock().await;

    let tool = db
        .tools
        .iter()
        .find(|tool| tool.id == new.tool_id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Tool not found"))?;
    if !tool.is_available() {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Tool is not available for checkout",
        ));
    }
    if !db.projects.iter().any(|p| p.id == new.project_id) {
        return Err(detail(StatusCode::NOT_FOUND, "Project not found"));
    }
    if !db.workers.iter().any(|w| w.id == new.worker_id) {
        return Err(detail(StatusCode::NOT_FOUND, "Worker not found"));
    }

    let record = CheckoutRecord {
        id: CheckoutId::new(new_id()),
        tool_id: new.tool_id.clone(),
        project_id: new.project_id,
        worker_id: new.worker_id,
        checkout_date: Utc::now(),
        expected_return: new.expected_return,
        return_date: None,
        status: CheckoutStatus::Active,
        notes: new.notes,
    };
    db.checkouts.push(record.clone());
    if let Some(tool) = db.tools.iter_mut().find(|tool| tool.id == new.tool_id) {
        tool.status = ToolStatus::CheckedOut;
        tool.updated_at = Some(Utc::now());
    }
    Ok(Json(record))
}

async fn return_tool(
    State(backend): State<FakeBackend>,
    Json(body): Json<Value>,
) -> HandlerResult<MessageResponse> {
    backend
        .record(Method::POST, "/api/return".into(), Some(body.clone()))
        .await?;
    let request: ReturnRequest = parse_body(body)?;
    let mut db = backend.db.lock().await;

    let checkout = db
        .checkouts
        .iter_mut()
        .find(|checkout| checkout.id == request.checkout_id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Checkout record not found"))?;
    if checkout.status != CheckoutStatus::Active {
        return Err(detail(StatusCode::BAD_REQUEST, "Tool is already returned"));
    }
    checkout.return_date = Some(Utc::now());
    checkout.status = CheckoutStatus::Returned;
    checkout.notes = request.notes;
    let tool_id = checkout.tool_id.clone();

    if let Some(tool) = db.tools.iter_mut().find(|tool| tool.id == tool_id) {
        tool.status = ToolStatus::Available;
        tool.updated_at = Some(Utc::now());
    }
    Ok(Json(MessageResponse {
        message: "Tool returned successfully".to_string(),
    }))
}

fn router(backend: FakeBackend) -> Router {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/tools", get(list_tools).post(create_tool))
        .route(
            "/api/tools/:id",
            get(get_tool).put(update_tool).delete(delete_tool),
        )
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/:id", get(get_project).put(update_project))
        .route("/api/workers", get(list_workers).post(create_worker))
        .route("/api/workers/:id", get(get_worker))
        .route("/api/checkouts", get(list_checkouts))
        .route("/api/checkouts/active", get(list_active_checkouts))
        .route("/api/checkout", post(create_checkout))
        .route("/api/return", post(return_tool))
        .with_state(backend)
}

/// Returns the backend url (without `/api`) and a handle to the fake's state.
pub async fn spawn_fake_backend() -> (String, FakeBackend) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    let backend = FakeBackend::default();
    let app = router(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), backend)
}

pub fn client_for(backend_url: &str) -> HttpToolRoomClient {
    HttpToolRoomClient::new(&Settings {
        backend_url: backend_url.to_string(),
        request_timeout_secs: 5,
    })
    .expect("client")
}
