use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    show_countdown, AnimationTimings, GameView, HttpGameBackend, InteractionController,
    CONNECTIVITY_ERROR_TEXT,
};
use shared::domain::Choice;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

mod view;

use view::TerminalView;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the scoring backend.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Run the 3-2-1 countdown before each round.
    #[arg(long)]
    countdown: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let backend = Arc::new(HttpGameBackend::new(&args.server_url)?);
    let view = Arc::new(TerminalView::new());
    let timings = AnimationTimings::default();
    let backend_handle: Arc<dyn client_core::GameBackend> = backend.clone();
    let controller = InteractionController::new(backend_handle, Arc::clone(&view), timings);

    view.print_banner(&args.server_url);
    controller.refresh_stats().await;
    view.print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim().to_ascii_lowercase();
        match command.as_str() {
            "" => {}
            "q" | "quit" | "exit" => break,
            "help" => view.print_help(),
            "stats" => controller.refresh_stats().await,
            "history" => match backend.fetch_history(10).await {
                Ok(entries) => view.print_history(&entries),
                Err(err) => {
                    error!(%err, "failed to fetch history");
                    view.render_error(CONNECTIVITY_ERROR_TEXT);
                }
            },
            "reset" => controller.reset_stats().await,
            other => match parse_choice(other) {
                Some(choice) => {
                    if args.countdown {
                        show_countdown(view.as_ref(), timings.countdown_tick).await;
                    }
                    controller.play_round(choice).await;
                }
                None => view.print_unknown_command(other),
            },
        }
    }

    Ok(())
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input {
        "r" => Some(Choice::Rock),
        "p" => Some(Choice::Paper),
        "s" => Some(Choice::Scissors),
        other => other.parse().ok(),
    }
}
