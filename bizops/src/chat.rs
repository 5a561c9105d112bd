//! Interactive chat session

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info, warn};

use crate::copilot::{ConversationManager, RequestState, Transcript, Turn, TurnRole};
use crate::render;

/// Outcome of a slash command
#[derive(Debug, PartialEq, Eq)]
enum SlashResult {
    Continue,
    Quit,
}

/// Chat REPL over a single transcript
pub struct ChatSession {
    manager: ConversationManager,
    transcript: Transcript,
    state: RequestState<String>,
}

impl ChatSession {
    pub fn new(manager: ConversationManager) -> Self {
        Self {
            manager,
            transcript: Transcript::with_greeting(),
            state: RequestState::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                        if let Some(turn) = self.transcript.last() {
                            println!("{}", render::render_turn(turn));
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        info!(turns = self.transcript.len(), "Chat session ended");
        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "BizOps Copilot".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
        for turn in self.transcript.turns() {
            println!("{}", render::render_turn(turn));
        }
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");
        debug!(%cmd, "handle_slash_command: called");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/clear" | "/c" => {
                self.transcript = Transcript::with_greeting();
                println!("{}", "Started a new conversation.".dimmed());
                SlashResult::Continue
            }
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the chat", "/quit".yellow());
        println!("  {:14} Start a new conversation", "/clear".yellow());
        println!("  {:14} Show conversation history", "/history".yellow());
        println!();
    }

    fn print_history(&self) {
        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, turn) in self.transcript.turns().iter().enumerate() {
            let role = match turn.role() {
                TurnRole::User => "User".bright_green(),
                TurnRole::Assistant => "BizOps".bright_blue(),
            };
            let preview: String = turn.text().chars().take(50).collect();
            let preview = if turn.text().chars().count() > 50 {
                format!("{}...", preview)
            } else {
                preview
            };
            let stamp = turn.created_at().format("%H:%M:%S");
            println!("  {}. [{}] {}: {}", i + 1, stamp, role, preview);
        }
        println!();
    }

    /// Send one message and append the user turn plus the reply or error turn
    async fn process_user_input(&mut self, input: &str) {
        debug!(input_len = %input.len(), "process_user_input: called");
        if let Err(e) = self.state.begin() {
            warn!(error = %e, "process_user_input: request already in flight");
            return;
        }

        let outcome = self.manager.send_turn(input, self.transcript.turns()).await;
        if let Err(e) = self.state.complete(outcome) {
            warn!(error = %e, "process_user_input: state out of sync");
        }

        self.transcript.push(Turn::user(input));
        match self.state.take() {
            Some(Ok(reply)) => self.transcript.push(Turn::assistant(reply)),
            Some(Err(message)) => {
                eprintln!("{}", message.red());
                self.transcript.push(Turn::error());
            }
            None => self.transcript.push(Turn::error()),
        }
    }
}
