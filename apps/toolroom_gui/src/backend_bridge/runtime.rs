//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{
    api::{HttpToolRoomClient, ToolRoomApi},
    config::Settings,
    controller::{execute_mutation, fetch_resource},
    store::StoreEvent,
};
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

/// Commands run one at a time, in queue order, so a mutation's follow-up
/// fetches always observe its effect.
pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match HttpToolRoomClient::new(&settings) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!("failed to build tool room client: {err}");
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Using backend {}",
            client.api_base()
        )));

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let name = cmd.name();
                let event = run_command(&client, cmd).await;
                if ui_tx.send(UiEvent::Store(event)).is_err() {
                    tracing::debug!(command = name, "ui receiver dropped; backend worker exiting");
                    break;
                }
            }
        });
        tracing::info!("backend worker stopped");
    });
}

async fn run_command(api: &dyn ToolRoomApi, cmd: BackendCommand) -> StoreEvent {
    match cmd {
        BackendCommand::Fetch(resource) => fetch_resource(api, resource).await,
        BackendCommand::Mutate(request) => StoreEvent::from(execute_mutation(api, request).await),
    }
}
