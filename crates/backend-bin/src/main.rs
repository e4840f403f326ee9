use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use admin_gate::{config::Settings, router, AppState};
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Admin area server guarded by the re-authentication gate
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML config file
    #[arg(short, long, env = "GATE_CONFIG_FILE", default_value = "gate.toml")]
    config: PathBuf,

    /// Override the bind address from the config file
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    let (state, _backends) = AppState::in_memory(settings)?;
    let state = Arc::new(state);
    state.sessions.spawn_cleanup(Duration::from_secs(60 * 60));

    let addr = state.settings.bind_addr;
    info!(
        %addr,
        relative_path = %state.settings.relative_path,
        relogin_minutes = state.settings.admin_relogin_duration,
        "starting admin gate"
    );

    let app = router::create_router(state);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    if settings.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
