use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sukuranburu_core::{Board, BoardSetup};
use sukuranburu_server::routes;
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_PORT: u16 = 8080;

#[derive(Parser)]
#[command(
    name = "sukuranburu-server",
    version,
    about = "Multiplayer memory board over HTTP"
)]
struct Args {
    /// Port to listen on; 0 selects the default (8080).
    port: u16,
    /// Board file: a `<rows>x<cols>` header, then one label per line.
    board: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let raw = tokio::fs::read_to_string(&args.board)
        .await
        .with_context(|| format!("reading board file {}", args.board.display()))?;
    let setup = BoardSetup::parse(&raw)
        .with_context(|| format!("parsing board file {}", args.board.display()))?;
    let board = Arc::new(Board::new(setup));
    info!(rows = board.rows(), cols = board.cols(), "board loaded");

    let port = if args.port == 0 { DEFAULT_PORT } else { args.port };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, routes::router(board)).await?;
    Ok(())
}
