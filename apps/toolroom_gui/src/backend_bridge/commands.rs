//! Backend commands queued from UI to backend worker.

use client_core::store::{MutationRequest, Resource};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Fetch(Resource),
    Mutate(MutationRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Fetch(resource) => resource.label(),
            BackendCommand::Mutate(request) => request.kind().name(),
        }
    }
}
