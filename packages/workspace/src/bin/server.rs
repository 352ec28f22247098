use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use templar_common::Config;
use templar_workspace::{router, AppState};

/// Templar file server - template access and version history for the editor
#[derive(Parser, Debug)]
#[command(name = "templar-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to the config value)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory containing the editor build to serve
    #[arg(long)]
    ui_dir: Option<PathBuf>,

    /// Directory holding templar.config.json (default: current dir)
    root_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let root_dir = match args.root_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let config = Config::load(&root_dir).context("Failed to load config")?;
    let base_dir = config.get_base_dir(&root_dir);
    let port = args.port.unwrap_or(config.port);

    let state = AppState::open(&base_dir, &config)?;
    let template_count = state.files.list().len();
    let app = router(state, args.ui_dir.clone());

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        base_dir = %base_dir.display(),
        templates = template_count,
        ui_dir = ?args.ui_dir,
        "Templar server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
