use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    DashboardController, DashboardState, DismissOutcome, FeederGateway, FillMode, HttpGateway,
    Page, PetRegistration, ScheduleEditor, WorkflowOutcome,
};
use shared::domain::Rfid;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod host;

use config::{load_settings, normalize_server_url};
use host::ConsoleHost;

#[derive(Parser, Debug)]
#[command(name = "feeder-dashboard", about = "Silo and pet feeder dashboard")]
struct Args {
    /// Backend base URL; overrides dashboard.toml and environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Which silo field carries the fill level (percentage | stock_weight).
    #[arg(long)]
    fill_mode: Option<FillMode>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show silos and unknown RFID reads.
    Show,
    /// Edit the feeding schedule of a registered pet.
    EditSchedule {
        #[arg(long)]
        rfid: String,
        #[arg(long)]
        time_window: Option<String>,
        #[arg(long)]
        amount: Option<String>,
    },
    /// Register a pet for an unknown RFID read.
    Register {
        #[arg(long)]
        rfid: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        silo: String,
        #[arg(long)]
        time_window: String,
        #[arg(long)]
        amount: String,
    },
    /// Dismiss an unknown RFID read without registering it.
    Dismiss {
        #[arg(long)]
        rfid: String,
    },
    /// Check that the backend is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url.as_deref() {
        settings.server_url = normalize_server_url(url);
    }
    if let Some(mode) = args.fill_mode {
        settings.fill_mode = mode;
    }
    info!(
        server_url = %settings.server_url,
        fill_mode = ?settings.fill_mode,
        "dashboard starting"
    );

    let gateway: Arc<dyn FeederGateway> = Arc::new(
        HttpGateway::new(&settings.server_url)
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?,
    );
    let host = Arc::new(ConsoleHost::default());
    let mut dashboard = DashboardController::new(gateway.clone(), host.clone(), settings.fill_mode);

    match args.command.unwrap_or(Command::Show) {
        Command::Show => show(&mut dashboard).await,
        Command::EditSchedule {
            rfid,
            time_window,
            amount,
        } => {
            let location = Page::EditSchedule {
                rfid: Rfid::new(rfid),
            }
            .href();
            let mut editor = ScheduleEditor::open(gateway, host.clone(), &location)
                .await
                .context("cannot open schedule editor")?;
            let form = editor.form_mut();
            if let Some(time_window) = time_window {
                form.time_window = time_window;
            }
            if let Some(amount) = amount {
                form.amount = amount;
            }
            let outcome = editor.submit().await;
            finish_workflow(outcome, &host, &mut dashboard).await
        }
        Command::Register {
            rfid,
            name,
            silo,
            time_window,
            amount,
        } => {
            let location = Page::RegisterPet {
                rfid: Rfid::new(rfid),
            }
            .href();
            let mut registration = PetRegistration::open(gateway, host.clone(), &location)
                .context("cannot open registration form")?;
            let form = registration.form_mut();
            form.name = name;
            form.silo = silo;
            form.time_window = time_window;
            form.amount = amount;
            let outcome = registration.submit().await;
            finish_workflow(outcome, &host, &mut dashboard).await
        }
        Command::Dismiss { rfid } => {
            if let DashboardState::Failed(message) = dashboard.load().await {
                bail!("{message}");
            }
            let outcome = dashboard.dismiss(&Rfid::new(rfid)).await;
            if let DismissOutcome::Dismissed = outcome {
                println!("Dismissed.");
            }
            print_state(dashboard.state())
        }
        Command::Health => {
            let status = gateway.health().await.context("health check failed")?;
            if !status.is_ok() {
                bail!("backend reports status '{}'", status.status);
            }
            println!("backend ok");
            Ok(())
        }
    }
}

async fn show(dashboard: &mut DashboardController) -> Result<()> {
    dashboard.load().await;
    print_state(dashboard.state())
}

fn print_state(state: &DashboardState) -> Result<()> {
    match state {
        DashboardState::Rendered(view) => {
            print!("{}", view.render_text());
            Ok(())
        }
        DashboardState::Failed(message) => bail!("{message}"),
        DashboardState::Loading => bail!("dashboard is still loading"),
    }
}

// Follows the navigation a completed workflow asked for.
async fn finish_workflow(
    outcome: WorkflowOutcome,
    host: &ConsoleHost,
    dashboard: &mut DashboardController,
) -> Result<()> {
    if outcome == WorkflowOutcome::StayOnForm {
        bail!("form was not submitted");
    }
    match host.take_navigation() {
        Some(Page::Dashboard) => show(dashboard).await,
        Some(other) => {
            println!("next: {}", other.href());
            Ok(())
        }
        None => Ok(()),
    }
}
