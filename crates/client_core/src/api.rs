use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{CheckoutRecord, CheckoutStatus, Project, ProjectId, Tool, ToolId, Worker, WorkerId},
    error::{ApiErrorBody, ApiException},
    protocol::{
        ActiveCheckout, CheckoutsQuery, DashboardSummary, MessageResponse, NewCheckout,
        NewProject, NewTool, NewWorker, ReturnRequest,
    },
};

use crate::{config::Settings, error::ClientError};

pub type ApiResult<T> = std::result::Result<T, ClientError>;

/// The REST backend as the client sees it. Every method is a single request.
#[async_trait]
pub trait ToolRoomApi: Send + Sync {
    async fn dashboard(&self) -> ApiResult<DashboardSummary>;

    async fn list_tools(&self) -> ApiResult<Vec<Tool>>;
    async fn create_tool(&self, tool: &NewTool) -> ApiResult<Tool>;
    async fn get_tool(&self, tool_id: &ToolId) -> ApiResult<Tool>;
    async fn update_tool(&self, tool_id: &ToolId, tool: &NewTool) -> ApiResult<Tool>;
    async fn delete_tool(&self, tool_id: &ToolId) -> ApiResult<MessageResponse>;

    async fn list_projects(&self) -> ApiResult<Vec<Project>>;
    async fn create_project(&self, project: &NewProject) -> ApiResult<Project>;
    async fn get_project(&self, project_id: &ProjectId) -> ApiResult<Project>;
    async fn update_project(
        &self,
        project_id: &ProjectId,
        project: &NewProject,
    ) -> ApiResult<Project>;

    async fn list_workers(&self) -> ApiResult<Vec<Worker>>;
    async fn create_worker(&self, worker: &NewWorker) -> ApiResult<Worker>;
    async fn get_worker(&self, worker_id: &WorkerId) -> ApiResult<Worker>;

    async fn list_active_checkouts(&self) -> ApiResult<Vec<ActiveCheckout>>;
    async fn list_checkouts(
        &self,
        status: Option<CheckoutStatus>,
    ) -> ApiResult<Vec<CheckoutRecord>>;
    async fn create_checkout(&self, checkout: &NewCheckout) -> ApiResult<CheckoutRecord>;
    async fn return_tool(&self, request: &ReturnRequest) -> ApiResult<MessageResponse>;
}

pub struct HttpToolRoomClient {
    http: Client,
    api_base: String,
}

impl HttpToolRoomClient {
    pub fn new(settings: &Settings) -> ApiResult<Self> {
        let api_base = settings.api_base()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        tracing::info!(api_base = %api_base, "tool room client ready");
        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        tracing::debug!(path, "GET");
        let response = self.http.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        tracing::debug!(path, method = %method, "sending");
        let response = self
            .http
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if status.is_success() {
        return Ok(serde_json::from_slice(&bytes)?);
    }

    // Non-JSON error pages (proxies, crashes) still become a Backend error.
    let body = serde_json::from_slice::<ApiErrorBody>(&bytes).unwrap_or_default();
    let exception = ApiException::new(status.as_u16(), &body);
    tracing::debug!(status = status.as_u16(), detail = ?exception.detail, "backend error");
    Err(exception.into())
}

#[async_trait]
impl ToolRoomApi for HttpToolRoomClient {
    async fn dashboard(&self) -> ApiResult<DashboardSummary> {
        self.get_json("/dashboard").await
    }

    async fn list_tools(&self) -> ApiResult<Vec<Tool>> {
        self.get_json("/tools").await
    }

    async fn create_tool(&self, tool: &NewTool) -> ApiResult<Tool> {
        self.send_json(reqwest::Method::POST, "/tools", tool).await
    }

    async fn get_tool(&self, tool_id: &ToolId) -> ApiResult<Tool> {
        self.get_json(&format!("/tools/{tool_id}")).await
    }

    async fn update_tool(&self, tool_id: &ToolId, tool: &NewTool) -> ApiResult<Tool> {
        self.send_json(reqwest::Method::PUT, &format!("/tools/{tool_id}"), tool)
            .await
    }

    async fn delete_tool(&self, tool_id: &ToolId) -> ApiResult<MessageResponse> {
        let response = self
            .http
            .delete(self.url(&format!("/tools/{tool_id}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get_json("/projects").await
    }

    async fn create_project(&self, project: &NewProject) -> ApiResult<Project> {
        self.send_json(reqwest::Method::POST, "/projects", project)
            .await
    }

    async fn get_project(&self, project_id: &ProjectId) -> ApiResult<Project> {
        self.get_json(&format!("/projects/{project_id}")).await
    }

    async fn update_project(
        &self,
        project_id: &ProjectId,
        project: &NewProject,
    ) -> ApiResult<Project> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("/projects/{project_id}"),
            project,
        )
        .await
    }

    async fn list_workers(&self) -> ApiResult<Vec<Worker>> {
        self.get_json("/workers").await
    }

    async fn create_worker(&self, worker: &NewWorker) -> ApiResult<Worker> {
        self.send_json(reqwest::Method::POST, "/workers", worker).await
    }

    async fn get_worker(&self, worker_id: &WorkerId) -> ApiResult<Worker> {
        self.get_json(&format!("/workers/{worker_id}")).await
    }

    async fn list_active_checkouts(&self) -> ApiResult<Vec<ActiveCheckout>> {
        self.get_json("/checkouts/active").await
    }

    async fn list_checkouts(
        &self,
        status: Option<CheckoutStatus>,
    ) -> ApiResult<Vec<CheckoutRecord>> {
        let response = self
            .http
            .get(self.url("/checkouts"))
            .query(&CheckoutsQuery { status })
            .send()
            .await?;
        decode(response).await
    }

    async fn create_checkout(&self, checkout: &NewCheckout) -> ApiResult<CheckoutRecord> {
        self.send_json(reqwest::Method::POST, "/checkout", checkout)
            .await
    }

    async fn return_tool(&self, request: &ReturnRequest) -> ApiResult<MessageResponse> {
        self.send_json(reqwest::Method::POST, "/return", request)
            .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
