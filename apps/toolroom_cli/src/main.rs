use std::path::PathBuf;

mod output;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    api::{HttpToolRoomClient, ToolRoomApi},
    config::{load_settings, ConfigOverrides},
    controller::{Controller, ControllerError},
    store::{CheckoutForm, FormKind, MutationOutput, ProjectForm, ToolForm, WorkerForm},
};
use shared::{
    domain::{CheckoutId, CheckoutStatus, ProjectId, ToolId, WorkerId},
    protocol::{NewProject, NewTool},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "toolroom", about = "Command-line client for the tool room backend")]
struct Args {
    /// TOML settings file; defaults to ./toolroom.toml, then the user config dir.
    #[arg(long, global = true, env = "TOOLROOM_CONFIG")]
    config: Option<PathBuf>,
    /// Backend root, e.g. http://127.0.0.1:8001.
    #[arg(long, global = true)]
    backend_url: Option<String>,
    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counts and the latest checkouts.
    Dashboard,
    Tools,
    Projects,
    Workers,
    /// Checkouts that have not been returned.
    Active,
    Tool {
        tool_id: String,
    },
    Project {
        project_id: String,
    },
    Worker {
        worker_id: String,
    },
    AddTool {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        serial_number: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    AddProject {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    AddWorker {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    Checkout {
        #[arg(long)]
        tool: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        worker: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        expected_return: String,
    },
    Return {
        checkout_id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Checkout history, optionally filtered by status.
    Checkouts {
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
    /// Changes only the fields that are given.
    UpdateTool {
        tool_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        serial_number: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Changes only the fields that are given. Dates are YYYY-MM-DD.
    UpdateProject {
        project_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    DeleteTool {
        tool_id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StatusFilter {
    Active,
    Returned,
    Overdue,
}

impl From<StatusFilter> for CheckoutStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Active => CheckoutStatus::Active,
            StatusFilter::Returned => CheckoutStatus::Returned,
            StatusFilter::Overdue => CheckoutStatus::Overdue,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let args = Args::parse();

    let settings = load_settings(&ConfigOverrides {
        config_path: args.config,
        backend_url: args.backend_url,
    })
    .context("failed to load tool room settings")?;
    let client = HttpToolRoomClient::new(&settings).context("failed to build backend client")?;
    let mut controller = Controller::new(client);

    run(&mut controller, args.command, args.json).await
}

async fn run(
    controller: &mut Controller<HttpToolRoomClient>,
    command: Command,
    json: bool,
) -> Result<()> {
    match command {
        Command::Dashboard => {
            let summary = controller
                .api()
                .dashboard()
                .await
                .context("failed to load dashboard")?;
            emit(json, &summary, output::dashboard_text)
        }
        Command::Tools => {
            let tools = controller
                .api()
                .list_tools()
                .await
                .context("failed to list tools")?;
            emit(json, &tools, |t| output::tools_text(t))
        }
        Command::Projects => {
            let projects = controller
                .api()
                .list_projects()
                .await
                .context("failed to list projects")?;
            emit(json, &projects, |p| output::projects_text(p))
        }
        Command::Workers => {
            let workers = controller
                .api()
                .list_workers()
                .await
                .context("failed to list workers")?;
            emit(json, &workers, |w| output::workers_text(w))
        }
        Command::Active => {
            let rows = controller
                .api()
                .list_active_checkouts()
                .await
                .context("failed to list active checkouts")?;
            emit(json, &rows, |r| output::active_text(r))
        }
        Command::Tool { tool_id } => {
            let tool = controller
                .api()
                .get_tool(&ToolId::new(tool_id))
                .await
                .context("failed to load tool")?;
            emit(json, &tool, |t| output::tools_text(std::slice::from_ref(t)))
        }
        Command::Project { project_id } => {
            let project = controller
                .api()
                .get_project(&ProjectId::new(project_id))
                .await
                .context("failed to load project")?;
            emit(json, &project, |p| {
                output::projects_text(std::slice::from_ref(p))
            })
        }
        Command::Worker { worker_id } => {
            let worker = controller
                .api()
                .get_worker(&WorkerId::new(worker_id))
                .await
                .context("failed to load worker")?;
            emit(json, &worker, |w| {
                output::workers_text(std::slice::from_ref(w))
            })
        }
        Command::UpdateTool {
            tool_id,
            name,
            category,
            description,
            serial_number,
            location,
        } => {
            let tool_id = ToolId::new(tool_id);
            let current = controller
                .api()
                .get_tool(&tool_id)
                .await
                .context("failed to load tool")?;
            let body = NewTool {
                name: name.unwrap_or(current.name),
                category: category.unwrap_or(current.category),
                description: overlay(description, current.description),
                serial_number: overlay(serial_number, current.serial_number),
                location: overlay(location, current.location),
                calibration_due: current.calibration_due,
            };
            tracing::debug!(tool = %tool_id, "updating tool");
            let tool = controller
                .api()
                .update_tool(&tool_id, &body)
                .await
                .context("failed to update tool")?;
            emit(json, &tool, |t| output::tools_text(std::slice::from_ref(t)))
        }
        Command::UpdateProject {
            project_id,
            name,
            start_date,
            end_date,
            description,
        } => {
            let project_id = ProjectId::new(project_id);
            let current = controller
                .api()
                .get_project(&project_id)
                .await
                .context("failed to load project")?;
            let body = NewProject {
                name: name.unwrap_or(current.name),
                description: overlay(description, current.description),
                start_date: match start_date {
                    Some(raw) => parse_date("start-date", &raw)?,
                    None => current.start_date,
                },
                end_date: match end_date {
                    Some(raw) if raw.trim().is_empty() => None,
                    Some(raw) => Some(parse_date("end-date", &raw)?),
                    None => current.end_date,
                },
                required_tools: current.required_tools,
            };
            tracing::debug!(project = %project_id, "updating project");
            let project = controller
                .api()
                .update_project(&project_id, &body)
                .await
                .context("failed to update project")?;
            emit(json, &project, |p| {
                output::projects_text(std::slice::from_ref(p))
            })
        }
        Command::Checkouts { status } => {
            let records = controller
                .api()
                .list_checkouts(status.map(CheckoutStatus::from))
                .await
                .context("failed to list checkouts")?;
            emit(json, &records, |r| output::checkouts_text(r))
        }
        Command::DeleteTool { tool_id } => {
            let response = controller
                .api()
                .delete_tool(&ToolId::new(tool_id))
                .await
                .context("failed to delete tool")?;
            emit(json, &response, |r| r.message.clone())
        }
        Command::AddTool {
            name,
            category,
            description,
            serial_number,
            location,
        } => {
            controller.state_mut().tool_form = ToolForm {
                name,
                description,
                category,
                serial_number,
                location,
            };
            let result = controller.submit(FormKind::Tool).await;
            print_mutation(result, json)
        }
        Command::AddProject {
            name,
            start_date,
            end_date,
            description,
        } => {
            controller.state_mut().project_form = ProjectForm {
                name,
                description,
                start_date,
                end_date,
            };
            let result = controller.submit(FormKind::Project).await;
            print_mutation(result, json)
        }
        Command::AddWorker {
            name,
            email,
            department,
            phone,
        } => {
            controller.state_mut().worker_form = WorkerForm {
                name,
                email,
                department,
                phone,
            };
            let result = controller.submit(FormKind::Worker).await;
            print_mutation(result, json)
        }
        Command::Checkout {
            tool,
            project,
            worker,
            expected_return,
        } => {
            controller.state_mut().checkout_form = CheckoutForm {
                tool_id: tool,
                project_id: project,
                worker_id: worker,
                expected_return,
            };
            let result = controller.submit(FormKind::Checkout).await;
            print_mutation(result, json)
        }
        Command::Return { checkout_id, notes } => {
            let result = controller
                .return_checkout(CheckoutId::new(checkout_id), notes)
                .await;
            print_mutation(result, json)
        }
    }
}

fn emit<T: serde::Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    if json {
        return output::print_json(value);
    }
    println!("{}", text(value));
    Ok(())
}

/// An explicit empty value clears an optional field.
fn overlay(given: Option<String>, current: Option<String>) -> Option<String> {
    match given {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value),
        None => current,
    }
}

fn parse_date(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("--{flag} must be YYYY-MM-DD, got '{raw}'"))
}

/// Mutation failures exit with the same text the GUI shows in its alert.
fn print_mutation(result: Result<MutationOutput, ControllerError>, json: bool) -> Result<()> {
    let done = result.map_err(|err| {
        tracing::warn!(error = %err, "mutation rejected");
        match err {
            ControllerError::Mutation(failure) => anyhow!(failure.alert_text()),
            other => anyhow!(other),
        }
    })?;

    match done {
        MutationOutput::Tool(tool) => emit(json, &tool, |t| {
            output::tools_text(std::slice::from_ref(t))
        }),
        MutationOutput::Project(project) => emit(json, &project, |p| {
            output::projects_text(std::slice::from_ref(p))
        }),
        MutationOutput::Worker(worker) => emit(json, &worker, |w| {
            output::workers_text(std::slice::from_ref(w))
        }),
        MutationOutput::Checkout(record) => emit(json, &record, |r| {
            output::checkouts_text(std::slice::from_ref(r))
        }),
        MutationOutput::Returned {
            checkout_id,
            message,
        } => emit(
            json,
            &serde_json::json!({ "checkout_id": checkout_id, "message": message }),
            |_| format!("{message} ({checkout_id})"),
        ),
    }
}
