//! Command orchestration helpers from UI actions to backend command queue.

use client_core::store::{
    AppState, FormKind, MutationFailure, MutationRequest, StoreError, StoreEvent,
};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::CheckoutId;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiErrorContext},
        reducer::StatusLine,
    },
};

/// Returns whether the command was queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut StatusLine,
) -> bool {
    let cmd_name = cmd.name();
    let problem = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            return true;
        }
        Err(TrySendError::Full(_)) => "UI command queue is full; please retry",
        Err(TrySendError::Disconnected(_)) => {
            "Backend command processor disconnected (possible startup/runtime failure); restart the app"
        }
    };
    tracing::warn!(command = cmd_name, "{problem}");
    status.raise(UiError::from_message(UiErrorContext::CommandQueue, problem));
    false
}

/// Starts a form submission. A request that cannot be queued is failed
/// locally so the in-flight flag never outlives it.
pub fn submit_form(
    cmd_tx: &Sender<BackendCommand>,
    state: &mut AppState,
    form: FormKind,
    status: &mut StatusLine,
) {
    match state.begin_submit(form) {
        Ok(request) => dispatch_mutation(cmd_tx, state, request, status),
        Err(err) => reject(status, &err),
    }
}

pub fn return_checkout(
    cmd_tx: &Sender<BackendCommand>,
    state: &mut AppState,
    checkout_id: CheckoutId,
    status: &mut StatusLine,
) {
    match state.begin_return(checkout_id) {
        Ok(request) => dispatch_mutation(cmd_tx, state, request, status),
        Err(err) => reject(status, &err),
    }
}

fn dispatch_mutation(
    cmd_tx: &Sender<BackendCommand>,
    state: &mut AppState,
    request: MutationRequest,
    status: &mut StatusLine,
) {
    let kind = request.kind();
    if dispatch_backend_command(cmd_tx, BackendCommand::Mutate(request), status) {
        status.text = format!("Waiting for backend: {}", kind.name());
        return;
    }
    let reason = status.text.clone();
    state.apply(StoreEvent::MutationFailed(MutationFailure::local(kind, reason)));
}

fn reject(status: &mut StatusLine, err: &StoreError) {
    tracing::debug!(error = %err, "submission rejected locally");
    status.raise(UiError::from_store(err));
}
