use clap::{Parser, Subcommand};
use cs_core::app_error::{AppError, AppResult};
use cs_core::config::load_server_config;
use cs_core::version_store::server_init;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cs_server")]
#[command(about = "camlsync server")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default configuration and the identity version_0.diff.
    Init { token: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Some(Command::Init { token }) => run_init(&token),
        None => run_serve().await,
    };
    if let Err(e) = result {
        eprintln!("error[{}]: {}", e.code, e.message);
        std::process::exit(1);
    }
}

fn run_init(token: &str) -> AppResult<()> {
    let config = server_init(Path::new("."), token)?;
    println!("server initialized: {} (version {})", config.server_id, config.version);
    Ok(())
}

async fn run_serve() -> AppResult<()> {
    let config = load_server_config(Path::new("."))?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        AppError::server_error(
            "failed binding server port",
            serde_json::json!({ "error": e.to_string(), "addr": addr.to_string() }),
        )
    })?;
    tracing::info!(%addr, version = config.version, "sync server listening");
    cs_server::http::serve(PathBuf::from("."), listener)
        .await
        .map_err(|e| {
            AppError::server_error(
                "server terminated unexpectedly",
                serde_json::json!({ "error": e.to_string() }),
            )
        })
}
