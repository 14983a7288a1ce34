use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::config::{load_settings, ConfigOverrides};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::commands::BackendCommand, controller::events::UiEvent, ui::ToolRoomApp,
};

const APP_TITLE: &str = "Tool Room Manager";

#[derive(Debug, Parser)]
#[command(name = "toolroom_gui", about = "Desktop client for the tool room backend")]
struct Args {
    /// TOML settings file; defaults to ./toolroom.toml, then the user config dir.
    #[arg(long, env = "TOOLROOM_CONFIG")]
    config: Option<PathBuf>,
    /// Backend root, e.g. http://127.0.0.1:8001 (the client appends /api).
    #[arg(long)]
    backend_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let settings = load_settings(&ConfigOverrides {
        config_path: args.config,
        backend_url: args.backend_url,
    })
    .context("failed to load tool room settings")?;
    tracing::info!(backend_url = %settings.backend_url, "starting {APP_TITLE}");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    let backend_url = settings.backend_url.clone();
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1180.0, 760.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(ToolRoomApp::new(cmd_tx, ui_rx, backend_url)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start {APP_TITLE}: {err}"))
}
