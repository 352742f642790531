//! Interactive chat REPL.
//!
//! The readline loop stays on the main task. Each turn is spawned onto the
//! runtime and its result comes back over a channel, so the prompt is usable
//! while the assistant is still thinking.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use storywell_application::WritingAssistantService;
use storywell_core::assistant::MessageRole;
use storywell_core::chat::{ChatSession, IgnoredReason, SubmitResult};
use tokio::sync::mpsc;

const SLASH_COMMANDS: &[&str] = &["/quota", "/settings", "/new", "/history", "/help"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum SlashCommand {
    Quota,
    /// Show settings, or set the authorized URL when an argument is given.
    Settings(Option<String>),
    New,
    History,
    Help,
    Unknown(String),
}

impl SlashCommand {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };

        Some(match name {
            "quota" => Self::Quota,
            "settings" => Self::Settings(arg.map(str::to_string)),
            "new" => Self::New,
            "history" => Self::History,
            "help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Completion and hints for slash commands.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: SLASH_COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

fn print_help() {
    println!("{}", "Type a message to chat with the assistant.".bright_black());
    println!("{}", "  /quota            show remaining AI requests".bright_black());
    println!("{}", "  /settings [url]   show settings, or set the authorized URL".bright_black());
    println!("{}", "  /new              discard this conversation and start over".bright_black());
    println!("{}", "  /history          print the conversation so far".bright_black());
    println!("{}", "  quit              leave".bright_black());
}

fn print_result(result: SubmitResult) {
    match result {
        SubmitResult::Replied(message) => super::print_assistant(&message),
        SubmitResult::Ignored(IgnoredReason::Busy) => {
            println!(
                "{}",
                "Still waiting for the previous reply; that message was not sent.".yellow()
            );
        }
        SubmitResult::Ignored(IgnoredReason::Closed) | SubmitResult::Discarded => {
            println!("{}", "(reply to a discarded conversation dropped)".bright_black());
        }
        SubmitResult::Ignored(IgnoredReason::Blank) => {}
    }
}

/// Local `HH:MM:SS` for a stored RFC 3339 timestamp, or the raw text if it
/// does not parse.
fn history_time(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|time| time.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

async fn print_history(session: &ChatSession) {
    let messages = session.messages().await;
    if messages.is_empty() {
        println!("{}", "No messages yet.".bright_black());
        return;
    }
    for message in &messages {
        print!("{} ", format!("[{}]", history_time(message.created_at())).bright_black());
        match message.role() {
            MessageRole::User => println!("{}", format!("> {}", message.text()).green()),
            MessageRole::Assistant => super::print_assistant(message),
        }
    }
}

async fn run_slash_command(
    command: SlashCommand,
    service: &WritingAssistantService,
    session: &mut Arc<ChatSession>,
) -> Result<()> {
    match command {
        SlashCommand::Quota => super::quota::show(service).await?,
        SlashCommand::Settings(None) => super::settings::show(service).await?,
        SlashCommand::Settings(Some(url)) => super::settings::set_url(service, &url).await?,
        SlashCommand::New => {
            session.close().await;
            *session = Arc::new(service.new_chat_session());
            tracing::info!(session_id = %session.id(), "[Chat] Started new session");
            println!("{}", "Started a new conversation.".bright_green());
        }
        SlashCommand::History => print_history(&**session).await,
        SlashCommand::Help => print_help(),
        SlashCommand::Unknown(name) => {
            println!("{}", format!("Unknown command: /{}", name).bright_black());
        }
    }
    Ok(())
}

pub async fn run(service: &WritingAssistantService) -> Result<()> {
    let mut session = Arc::new(service.new_chat_session());
    let (result_tx, mut result_rx) = mpsc::channel::<SubmitResult>(32);

    let printer = tokio::spawn(async move {
        while let Some(result) = result_rx.recv().await {
            print_result(result);
        }
    });

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new()));

    println!("{}", "=== Storywell Assistant ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Running in {} mode. Type /help for commands.", service.mode()).bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(command) = SlashCommand::parse(trimmed) {
                    if let Err(e) = run_slash_command(command, service, &mut session).await {
                        eprintln!("{}", format!("Error: {:#}", e).red());
                    }
                    continue;
                }

                let tx = result_tx.clone();
                let turn_session = Arc::clone(&session);
                let input = trimmed.to_string();
                tokio::spawn(async move {
                    let result = turn_session.submit(&input).await;
                    let _ = tx.send(result).await;
                });
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    session.close().await;
    drop(result_tx);
    let _ = printer.await;

    Ok(())
}
