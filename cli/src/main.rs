use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod sim;

#[derive(Parser)]
#[command(
    name = "sukuranburu-cli",
    version,
    about = "Offline drivers for sukuranburu boards"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hammer an in-process board with randomized concurrent players.
    Sim {
        #[arg(long)]
        board: PathBuf,
        #[arg(long, default_value_t = 4)]
        players: usize,
        #[arg(long, default_value_t = 100)]
        tries: usize,
        #[arg(long, default_value_t = 2)]
        max_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sim {
            board,
            players,
            tries,
            max_delay_ms,
        } => sim::run(&board, players, tries, max_delay_ms).await,
    }
}
