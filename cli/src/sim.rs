use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use sukuranburu_core::{Board, BoardSetup};
use tokio::time::sleep;

pub(super) async fn run(
    board_path: &Path,
    players: usize,
    tries: usize,
    max_delay_ms: u64,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(board_path)
        .await
        .with_context(|| format!("reading board file {}", board_path.display()))?;
    let setup = BoardSetup::parse(&raw)
        .with_context(|| format!("parsing board file {}", board_path.display()))?;
    let board = Arc::new(Board::new(setup));

    println!(
        "simulating {players} players, {tries} tries each, on a {}x{} board",
        board.rows(),
        board.cols()
    );
    println!("initial:\n{}\n", board.look("sim").await);

    let mut tasks = Vec::with_capacity(players);
    for player_num in 0..players {
        let board = Arc::clone(&board);
        tasks.push(tokio::spawn(async move {
            play(board, format!("player_{player_num}"), tries, max_delay_ms).await
        }));
    }

    for task in tasks {
        let outcome = task.await?;
        println!(
            "{}: {} moves completed, {} failed",
            outcome.player, outcome.completed, outcome.failed
        );
    }

    println!("\nfinal:\n{}", board.look("sim").await);
    Ok(())
}

struct Outcome {
    player: String,
    completed: usize,
    failed: usize,
}

async fn play(board: Arc<Board>, player: String, tries: usize, max_delay_ms: u64) -> Outcome {
    let rows = board.rows();
    let cols = board.cols();
    let mut completed = 0;
    let mut failed = 0;

    for _ in 0..tries {
        think(max_delay_ms).await;
        let (row, col) = random_coord(rows, cols);
        if board.flip(&player, row, col).await.is_err() {
            failed += 1;
            continue;
        }

        think(max_delay_ms).await;
        let (row, col) = random_coord(rows, cols);
        match board.flip(&player, row, col).await {
            Ok(_) => completed += 1,
            Err(_) => failed += 1,
        }
    }

    Outcome {
        player,
        completed,
        failed,
    }
}

fn random_coord(rows: usize, cols: usize) -> (usize, usize) {
    let mut rng = rand::rng();
    (rng.random_range(0..rows), rng.random_range(0..cols))
}

async fn think(max_delay_ms: u64) {
    if max_delay_ms == 0 {
        return;
    }
    let delay = {
        let mut rng = rand::rng();
        rng.random_range(0..=max_delay_ms)
    };
    sleep(Duration::from_millis(delay)).await;
}
