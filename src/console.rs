//! Interactive console driver for the match engine.
//!
//! Thin presentation glue: reads commands from stdin, forwards intents
//! to the controller, and delivers the controller's scheduled events
//! (computer replies, countdown ticks) on a timer. No game logic lives
//! here.

use anyhow::Result;
use noughts::{
    Difficulty, FeedbackRecord, FeedbackSink, LogSink, MatchController, MatchView, Mode,
    StatusKind,
};
use std::io::{self, BufRead, Write};
use strum::IntoEnumIterator;
use tokio::time::{Duration, sleep};
use tracing::debug;

/// Delay before the computer's reply lands, so its turn is perceptible.
const THINK_DELAY: Duration = Duration::from_millis(500);

/// One countdown tick per second between rounds.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the interactive loop until the player quits or stdin closes.
pub async fn run(mode: Option<Mode>, seed: Option<u64>, json: bool) -> Result<()> {
    let mut controller = MatchController::new();
    let sink = LogSink::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mode = match mode {
        Some(mode) => mode,
        None => match prompt_mode(&mut lines)? {
            Some(mode) => mode,
            None => return Ok(()),
        },
    };
    start_match(&mut controller, mode, seed);
    render(&controller.view(), json);

    while let Some(command) = next_command(&mut lines)? {
        match command.as_str() {
            "quit" | "q" => break,
            "restart" => controller.restart_round(),
            "rematch" => controller.restart_match(),
            "menu" => {
                controller.return_to_mode_select();
                match prompt_mode(&mut lines)? {
                    Some(mode) => start_match(&mut controller, mode, seed),
                    None => break,
                }
            }
            "feedback" => {
                collect_feedback(&mut lines, &sink)?;
                continue;
            }
            other => match other.parse::<usize>() {
                Ok(index) => controller.click_cell(index),
                Err(_) => {
                    println!("Commands: 0-8, restart, rematch, menu, feedback, quit");
                    continue;
                }
            },
        }

        render(&controller.view(), json);
        settle(&mut controller, json).await;
    }

    Ok(())
}

/// Starts a match, threading the seed through when one was given.
fn start_match(controller: &mut MatchController, mode: Mode, seed: Option<u64>) {
    match seed {
        Some(seed) => controller.select_mode_seeded(mode, seed),
        None => controller.select_mode(mode),
    }
}

/// Delivers scheduled events until the controller has none pending:
/// first the delayed computer reply, then countdown ticks.
async fn settle(controller: &mut MatchController, json: bool) {
    if let Some(token) = controller.pending_reply() {
        sleep(THINK_DELAY).await;
        controller.computer_reply(token);
        render(&controller.view(), json);
    }
    while let Some(token) = controller.countdown_token() {
        sleep(TICK_INTERVAL).await;
        controller.tick(token);
        render(&controller.view(), json);
    }
}

/// Prints the current state, as board text or one JSON line.
fn render(view: &MatchView, json: bool) {
    if json {
        match serde_json::to_string(view) {
            Ok(line) => println!("{line}"),
            Err(e) => debug!(error = %e, "Skipping unserializable view"),
        }
        return;
    }

    println!();
    println!("{}", view.board().render());
    match view.status() {
        StatusKind::AwaitingModeSelection => println!("Select a mode to start."),
        StatusKind::InProgress => {
            if let Some(mark) = view.to_move() {
                println!(
                    "{} to move. Round {} of {}.",
                    mark.symbol(),
                    view.round(),
                    view.round_limit()
                );
            }
        }
        StatusKind::Win(mark) => println!("{} wins the round!", mark.symbol()),
        StatusKind::Draw => println!("The round is a draw."),
        StatusKind::MatchOver => println!("Match over. Type 'rematch' to play again."),
    }

    let score = view.score();
    println!(
        "Score: X {} / O {} / draws {}",
        score.x_wins(),
        score.o_wins(),
        score.draws()
    );
    if let Some(remaining) = view.countdown() {
        println!("Next round in {remaining}...");
    }
}

/// Asks for a mode until one is chosen; `None` when stdin closes.
fn prompt_mode<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<Mode>> {
    println!("Choose a mode:");
    println!("  1) Two players");
    for (offset, difficulty) in Difficulty::iter().enumerate() {
        println!(
            "  {}) Against the computer ({})",
            offset + 2,
            difficulty.label()
        );
    }

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let choice = line?;
        let choice = choice.trim();

        if choice == "1" {
            return Ok(Some(Mode::TwoPlayer));
        }
        let difficulty = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(2))
            .and_then(|offset| Difficulty::iter().nth(offset));
        match difficulty {
            Some(difficulty) => return Ok(Some(Mode::VsComputer(difficulty))),
            None => println!("Unrecognized choice: {choice}"),
        }
    }
}

/// Gathers a feedback record and hands it to the sink. Failures are
/// shown as notifications; the match is untouched either way.
fn collect_feedback<B: BufRead>(lines: &mut io::Lines<B>, sink: &LogSink) -> Result<()> {
    let Some(email) = prompt_line(lines, "Email: ")? else {
        return Ok(());
    };
    let Some(phone) = prompt_line(lines, "Phone: ")? else {
        return Ok(());
    };
    let Some(message) = prompt_line(lines, "Feedback: ")? else {
        return Ok(());
    };

    match FeedbackRecord::new(email, phone, message).and_then(|record| sink.submit(&record)) {
        Ok(id) => println!("Thanks! Feedback recorded as {id}."),
        Err(e) => println!("Feedback not submitted: {e}"),
    }
    Ok(())
}

/// Reads the next command, lowercased and trimmed; `None` on EOF.
fn next_command<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_lowercase())),
        None => Ok(None),
    }
}

/// Reads one prompted line; `None` on EOF.
fn prompt_line<B: BufRead>(lines: &mut io::Lines<B>, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}
