use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{GameController, GameServer, GameView, HttpGameServer, LeaderboardView};
use serde::Serialize;
use shared::domain::Difficulty;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod play;
mod terminal;

use terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(name = "spider-guesser", version, about = "Play Spider-Guesser against a game server")]
struct Args {
    /// Game server base url. Overrides the config file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Config file path (defaults to ./guesser.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print raw JSON instead of formatted output for one-shot commands.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive game (default).
    Play {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },
    /// Show the top players.
    Leaderboard,
    /// Show the state of one game.
    Status { game_id: String },
    Health,
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let server_url = config::validate_server_url(&settings.server_url)?;
    info!(%server_url, "using game server");
    let server = HttpGameServer::new(&server_url)?;

    match args.command.unwrap_or(Command::Play {
        name: None,
        difficulty: None,
    }) {
        Command::Play { name, difficulty } => play_interactive(server, name, difficulty).await,
        Command::Leaderboard => {
            let entries = server
                .fetch_leaderboard()
                .await
                .context("failed to load leaderboard")?;
            if args.json {
                return print_json(&entries);
            }
            let mut view = TerminalView::new(io::stdout());
            view.render_leaderboard(&LeaderboardView::from_entries(entries));
            Ok(())
        }
        Command::Status { game_id } => {
            let status = server
                .game_status(&game_id)
                .await
                .with_context(|| format!("failed to fetch game {game_id}"))?;
            if args.json {
                return print_json(&status);
            }
            TerminalView::new(io::stdout()).game_status(&status);
            Ok(())
        }
        Command::Health => {
            let health = server.health().await.context("health check failed")?;
            if args.json {
                return print_json(&health);
            }
            TerminalView::new(io::stdout()).health(&health);
            Ok(())
        }
        Command::Stats => {
            let stats = server.stats().await.context("failed to fetch stats")?;
            if args.json {
                return print_json(&stats);
            }
            TerminalView::new(io::stdout()).stats(&stats);
            Ok(())
        }
    }
}

async fn play_interactive(
    server: HttpGameServer,
    name: Option<String>,
    difficulty: Option<Difficulty>,
) -> Result<()> {
    let mut controller = GameController::new(server, TerminalView::new(io::stdout()));
    controller.initialize();

    if let Some(difficulty) = difficulty {
        controller.select_difficulty(difficulty);
    }
    if let Some(name) = name {
        if let Some(notice) = controller.submit_start(&name).await {
            controller.view_mut().notice(&notice);
        }
    }

    play::run(&mut controller, BufReader::new(tokio::io::stdin())).await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
