//! Interactive game loop: stdin lines become controller events.

use std::io::Write;

use anyhow::Context;
use client_core::{GameController, GameServer, Notice, Screen};
use shared::domain::Difficulty;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::terminal::TerminalView;

pub const RESULT_HELP: &str = "Type :restart to play again or :quit to leave.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Quit,
    ToggleLeaderboard,
    Restart,
    Select(Difficulty),
    Start(String),
    Guess(String),
    Help,
}

/// Maps one input line to a command. Plain text means different things per screen.
pub fn parse_command(screen: Screen, line: &str) -> PlayCommand {
    let trimmed = line.trim();
    if let Some(command) = trimmed.strip_prefix(':') {
        return match command.to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => PlayCommand::Quit,
            "b" | "board" | "leaderboard" => PlayCommand::ToggleLeaderboard,
            "r" | "restart" | "new" => PlayCommand::Restart,
            other => match other.parse::<Difficulty>() {
                Ok(difficulty) => PlayCommand::Select(difficulty),
                Err(_) => PlayCommand::Help,
            },
        };
    }
    match screen {
        Screen::Setup => PlayCommand::Start(line.to_string()),
        Screen::ActiveGame => PlayCommand::Guess(line.to_string()),
        Screen::Result => PlayCommand::Help,
    }
}

fn prompt_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Setup => "hero name",
        Screen::ActiveGame => "guess",
        Screen::Result => "next",
    }
}

pub async fn run<S, W, R>(
    controller: &mut GameController<S, TerminalView<W>>,
    input: R,
) -> anyhow::Result<()>
where
    S: GameServer,
    W: Write,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        let label = prompt_label(controller.screen());
        controller.view_mut().prompt(label);
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        let command = parse_command(controller.screen(), &line);
        debug!(?command, screen = ?controller.screen(), "input command");
        let notice = match command {
            PlayCommand::Quit => break,
            PlayCommand::ToggleLeaderboard => {
                controller.toggle_leaderboard().await;
                None
            }
            PlayCommand::Restart => {
                controller.restart();
                None
            }
            PlayCommand::Select(difficulty) => controller.select_difficulty(difficulty),
            PlayCommand::Start(name) => controller.submit_start(&name).await,
            PlayCommand::Guess(raw) => {
                let outcome = controller.submit_guess(&raw).await;
                // Mid-game messages were already drawn as the hint.
                if controller.session().is_some() {
                    None
                } else {
                    outcome.notice().cloned()
                }
            }
            PlayCommand::Help => Some(Notice::info(match controller.screen() {
                Screen::Result => RESULT_HELP,
                _ => "Commands: :easy :medium :hard :board :restart :quit",
            })),
        };
        if let Some(notice) = notice {
            controller.view_mut().notice(&notice);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/play_tests.rs"]
mod tests;
