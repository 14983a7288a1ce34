//! Folds backend events into the store and the status line, and answers with
//! the follow-up commands the UI must queue.

use client_core::store::{AppState, Loaded, Resource, StoreEvent};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiEvent},
};

#[derive(Debug, Default)]
pub struct StatusLine {
    pub text: String,
    pub banner: Option<UiError>,
}

impl StatusLine {
    pub fn raise(&mut self, err: UiError) {
        self.text = err.message().to_string();
        self.banner = Some(err);
    }
}

pub fn reduce(
    state: &mut AppState,
    status: &mut StatusLine,
    event: UiEvent,
) -> Vec<BackendCommand> {
    match event {
        UiEvent::Info(message) => {
            status.text = message;
            Vec::new()
        }
        UiEvent::Error(err) => {
            tracing::error!(
                context = ?err.context(),
                category = ?err.category(),
                "{}",
                err.message()
            );
            status.raise(err);
            Vec::new()
        }
        UiEvent::Store(event) => {
            let tools_reloaded = matches!(&event, StoreEvent::Loaded(Loaded::Tools(_)));
            if let StoreEvent::MutationSucceeded(output) = &event {
                status.text = format!("{} succeeded", output.kind().name());
            }
            let refetch = state.apply(event);
            if tools_reloaded {
                drop_unavailable_tool_selection(state);
            }
            refetch.into_iter().map(BackendCommand::Fetch).collect()
        }
    }
}

pub fn initial_commands() -> Vec<BackendCommand> {
    Resource::ALL.into_iter().map(BackendCommand::Fetch).collect()
}

/// A tool that left the available set can no longer be checked out.
fn drop_unavailable_tool_selection(state: &mut AppState) {
    let selected = state.checkout_form.tool_id.as_str();
    if selected.is_empty() {
        return;
    }
    if !state.available_tools().any(|tool| tool.id.as_str() == selected) {
        state.checkout_form.tool_id.clear();
    }
}
