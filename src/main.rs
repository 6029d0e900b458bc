use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flight_booking_service::dataset;
use flight_booking_service::server::{self, Config};
use flight_booking_service::store::FlightStore;

#[derive(Debug, Parser)]
#[command(about = "Flight, route, and booking API over a static dataset")]
struct Args {
    /// Path to the routes dataset file
    #[arg(long, default_value = "data/routes.json")]
    dataset: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let routes = dataset::load_routes(&args.dataset)
        .with_context(|| format!("failed to load dataset from {}", args.dataset.display()))?;
    info!(routes = routes.len(), "dataset loaded");

    let store = Arc::new(FlightStore::from_routes(routes));
    server::serve(&Config { addr: args.addr }, store).await?;
    Ok(())
}
