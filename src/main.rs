use clap::Parser;
use pregnancy_dashboard::{
    agenda::AgendaStore,
    config::{ConfigLoader, Settings},
    dashboard, database, logging,
    state::AppState,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "A personal dashboard showing pregnancy progress and an agenda.",
    long_about = "Serves an HTML dashboard with pregnancy progress (weeks, trimester, due date) and upcoming agenda items. Configuration is read from a YAML file with per-environment overrides."
)]
struct Args {
    /// Configuration file. Defaults to $CONFIG_FILE, then ./config.yaml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment whose overrides are applied. Defaults to $ENVIRONMENT, then production.
    #[arg(short, long)]
    environment: Option<String>,

    /// Override the configured listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port.
    #[arg(short, long)]
    port: Option<u16>,
}

// --- Main Application Entry Point ---
#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Arc::new(ConfigLoader::new());
    // The configured subscriber needs the configuration; until then log to stderr.
    tracing::subscriber::with_default(logging::startup_subscriber(std::io::stderr), || {
        if let Some(path) = args.config {
            loader.set_source(path);
        }
        if let Some(env) = args.environment {
            loader.set_environment(env);
        }
        loader.load(None)
    })?;

    let mut settings = Settings::from_tree(&loader.config())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    logging::init(&settings.logging);
    info!(
        source = ?loader.source(),
        environment = ?loader.environment(),
        "configuration loaded"
    );

    let pool = database::connect(&settings.database).await?;
    let agenda = AgendaStore::new(pool);
    if settings.database.create_tables {
        agenda.create_tables().await?;
    }

    let addr = settings.server.bind_addr();
    let app = dashboard::build_router(AppState::new(settings, agenda));

    let listener = TcpListener::bind(&addr).await?;
    info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// --- Graceful Shutdown Handler ---
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown...");
}
