use shared::domain::CheckoutId;
use thiserror::Error;

use crate::{
    api::ToolRoomApi,
    store::{
        AppState, FormKind, Loaded, MutationFailure, MutationOutput, MutationRequest, Resource,
        StoreError, StoreEvent,
    },
};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Mutation(#[from] MutationFailure),
}

/// Runs fetches and mutations against the backend and keeps an [`AppState`]
/// in step with the results.
pub struct Controller<A> {
    api: A,
    state: AppState,
}

impl<A: ToolRoomApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: AppState::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub async fn load_all(&mut self) {
        self.refresh(&Resource::ALL).await;
    }

    /// Sequential on purpose: the dashboard is fetched after the lists it
    /// summarizes when both are invalidated.
    pub async fn refresh(&mut self, resources: &[Resource]) {
        for &resource in resources {
            let event = fetch_resource(&self.api, resource).await;
            self.state.apply(event);
        }
    }

    pub async fn submit(&mut self, form: FormKind) -> Result<MutationOutput, ControllerError> {
        let request = self.state.begin_submit(form)?;
        self.run(request).await
    }

    pub async fn return_checkout(
        &mut self,
        checkout_id: CheckoutId,
        notes: Option<String>,
    ) -> Result<MutationOutput, ControllerError> {
        let request = self.state.begin_return_with_notes(checkout_id, notes)?;
        self.run(request).await
    }

    async fn run(&mut self, request: MutationRequest) -> Result<MutationOutput, ControllerError> {
        let result = execute_mutation(&self.api, request).await;
        let refetch = self.state.apply(StoreEvent::from(result.clone()));
        self.refresh(&refetch).await;
        result.map_err(ControllerError::from)
    }
}

pub async fn fetch_resource<A: ToolRoomApi + ?Sized>(api: &A, resource: Resource) -> StoreEvent {
    let loaded = match resource {
        Resource::Dashboard => api.dashboard().await.map(Loaded::Dashboard),
        Resource::Tools => api.list_tools().await.map(Loaded::Tools),
        Resource::Projects => api.list_projects().await.map(Loaded::Projects),
        Resource::Workers => api.list_workers().await.map(Loaded::Workers),
        Resource::ActiveCheckouts => api
            .list_active_checkouts()
            .await
            .map(Loaded::ActiveCheckouts),
    };

    match loaded {
        Ok(loaded) => StoreEvent::Loaded(loaded),
        Err(err) => StoreEvent::LoadFailed {
            resource,
            message: err.to_string(),
        },
    }
}

/// Issues exactly one backend call for the request.
pub async fn execute_mutation<A: ToolRoomApi + ?Sized>(
    api: &A,
    request: MutationRequest,
) -> Result<MutationOutput, MutationFailure> {
    let kind = request.kind();
    let result = match &request {
        MutationRequest::CreateTool(body) => api.create_tool(body).await.map(MutationOutput::Tool),
        MutationRequest::CreateProject(body) => api
            .create_project(body)
            .await
            .map(MutationOutput::Project),
        MutationRequest::CreateWorker(body) => {
            api.create_worker(body).await.map(MutationOutput::Worker)
        }
        MutationRequest::CreateCheckout(body) => api
            .create_checkout(body)
            .await
            .map(MutationOutput::Checkout),
        MutationRequest::ReturnTool(body) => {
            api.return_tool(body)
                .await
                .map(|response| MutationOutput::Returned {
                    checkout_id: body.checkout_id.clone(),
                    message: response.message,
                })
        }
    };

    result.map_err(|err| {
        if err.is_timeout() {
            tracing::warn!(mutation = kind.name(), "backend call timed out");
        }
        MutationFailure::from_error(kind, &err)
    })
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
