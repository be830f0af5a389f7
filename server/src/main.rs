use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use server::{app, AppState, DEFAULT_MAX_DAYS};
use tracing_subscriber::EnvFilter;
use travelgpt::{Planner, ProviderConfig};

#[derive(Parser, Debug)]
#[command(name = "server", about = "TravelGPT itinerary service")]
struct ServerArgs {
    #[arg(long, env = "PORT", default_value_t = 7860)]
    port: u16,

    /// Directory holding the built frontend
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    #[arg(long, env = "MAX_TRIP_DAYS", default_value_t = DEFAULT_MAX_DAYS)]
    max_days: i64,

    #[command(flatten)]
    providers: ProviderConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("server=info,travelgpt=info,tower_http=info")),
        )
        .init();

    let args = ServerArgs::parse();

    let state = AppState {
        planner: Planner::from_config(&args.providers)?,
        max_days: args.max_days,
    };
    let app = app(state, args.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!(%addr, "listening");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .into_diagnostic()?;

    Ok(())
}
