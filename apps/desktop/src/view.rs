use std::io::{self, Write};

use client_core::GameView;
use colored::Colorize;
use dialoguer::Confirm;
use shared::{
    domain::{Choice, Outcome},
    protocol::{HistoryEntry, StatsSnapshot},
};

/// Line-oriented terminal rendering. Everything scrolls, so the "clear"
/// calls of the view contract are mostly no-ops here.
pub struct TerminalView;

fn hand_glyph(choice: Choice) -> &'static str {
    match choice {
        Choice::Rock => "✊",
        Choice::Paper => "✋",
        Choice::Scissors => "✌",
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    pub fn print_banner(&self, server_url: &str) {
        println!("{}", "=".repeat(50));
        println!("{}", "  Rock-Paper-Scissors".bright_cyan().bold());
        println!("  scoring backend: {server_url}");
        println!("{}", "=".repeat(50));
    }

    pub fn print_help(&self) {
        println!();
        println!(
            "  {} rock/paper/scissors (or r/p/s) to play, {} to refresh,",
            "commands:".bold(),
            "stats".bold()
        );
        println!(
            "  {} for recent rounds, {} to zero the counters, {} to leave",
            "history".bold(),
            "reset".bold(),
            "quit".bold()
        );
        println!();
    }

    pub fn print_history(&self, entries: &[HistoryEntry]) {
        if entries.is_empty() {
            println!("{}", "  No rounds played yet.".dimmed());
            return;
        }
        for entry in entries {
            let result = match entry.result {
                Outcome::Player => "WIN".bright_green().bold(),
                Outcome::Computer => "LOSS".red(),
                Outcome::Draw => "DRAW".yellow(),
            };
            println!(
                "  {}  {} vs {}  {}",
                entry.played_at.format("%Y-%m-%d %H:%M:%S"),
                entry.player_choice.as_str().bright_blue(),
                entry.computer_choice.as_str().bright_magenta(),
                result
            );
        }
    }

    pub fn print_unknown_command(&self, command: &str) {
        println!(
            "{}",
            format!("  Unknown command '{command}'; try rock, paper or scissors.").red()
        );
    }
}

impl GameView for TerminalView {
    fn render_hands(&self, player: Choice, computer: Choice) {
        println!(
            "  You: {} {}   Computer: {} {}",
            hand_glyph(player),
            player.as_str().bright_blue(),
            hand_glyph(computer),
            computer.as_str().bright_magenta()
        );
    }

    fn render_neutral_hands(&self) {
        println!("  You: ✊           Computer: ✊");
    }

    fn set_shaking(&self, shaking: bool) {
        if shaking {
            println!("{}", "  rock... paper... scissors...".dimmed());
        } else {
            println!("{}", "  shoot!".bold());
        }
    }

    fn set_inputs_enabled(&self, _enabled: bool) {
        // Line-buffered stdin cannot be disabled; overlapping plays are
        // already dropped by the controller's busy guard.
    }

    fn clear_result(&self) {}

    fn render_result(&self, outcome: Outcome) {
        match outcome {
            Outcome::Player => println!("{}", "  🎉 You Win!".bright_green().bold()),
            Outcome::Computer => println!("{}", "  😢 Computer Wins!".red()),
            Outcome::Draw => println!("{}", "  🤝 It's a Draw!".yellow()),
        }
    }

    fn render_message(&self, text: &str) {
        println!("  {text}");
    }

    fn render_error(&self, text: &str) {
        println!("{}", format!("  {text}").red().bold());
    }

    fn render_stats(&self, stats: &StatsSnapshot) {
        println!(
            "  {} {}   {} {}   {} {}   {} {}",
            "wins:".bold(),
            stats.player_wins.to_string().bright_green(),
            "losses:".bold(),
            stats.computer_wins.to_string().red(),
            "draws:".bold(),
            stats.draws.to_string().yellow(),
            "total:".bold(),
            stats.total_games
        );
    }

    fn render_streak(&self, current: u32, best: u32) {
        println!(
            "  {} {current}   {} {best}",
            "streak:".bold(),
            "best:".bold()
        );
    }

    fn show_combo_effect(&self, multiplier: u32) {
        println!(
            "{}",
            format!("  🔥 {multiplier}x COMBO! 🔥").bright_yellow().bold()
        );
    }

    fn clear_combo_effect(&self) {}

    fn countdown_tick(&self, remaining: u8) {
        // BEL doubles as the audio cue for each tick.
        print!("  {remaining}...\x07");
        io::stdout().flush().ok();
    }

    fn clear_countdown(&self) {
        println!("{}", " go!".bold());
    }

    fn confirm_reset(&self) -> bool {
        Confirm::new()
            .with_prompt("Are you sure you want to reset all statistics?")
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
