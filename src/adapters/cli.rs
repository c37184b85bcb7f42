//! CLI adapter — interactive and single-message command line interface.
//!
//! The channel owns the transcript and hands it to the session on every
//! turn; the session itself keeps nothing between turns.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::agent::{ChatSession, LlmClient, Message, Outcome, Reply, Role};
use crate::ui;
use crate::Result;

/// CLI channel for interactive sessions.
pub struct CliChannel<C: LlmClient> {
    session: ChatSession<C>,
    history: Vec<Message>,
}

impl<C: LlmClient> CliChannel<C> {
    /// Create a new CLI channel.
    pub fn new(session: ChatSession<C>) -> Self {
        Self {
            session,
            history: Vec::new(),
        }
    }

    /// Open the transcript with an assistant greeting. Blank greetings are ignored.
    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        if let Some(greeting) = greeting.filter(|g| !g.trim().is_empty()) {
            self.history.push(Message::assistant(greeting));
        }
        self
    }

    /// Run a single message and record the exchange in the transcript.
    pub async fn run_once(&mut self, message: &str) -> Reply {
        let reply = self.session.ask(message, &self.history).await;

        self.history.push(Message::user(message));
        self.history.push(Message::assistant(reply.content.clone()));

        reply
    }

    /// Run interactive REPL loop.
    pub async fn run_interactive(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let name = self.session.profile().name().to_string();

        if let Some(greeting) = self.history.first().filter(|m| m.role == Role::Assistant) {
            println!("\n{}: {}", name.green().bold(), greeting.text());
        }

        loop {
            print!("\n{}: ", "You".blue().bold());
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match input.to_lowercase().as_str() {
                "exit" | "quit" | "q" => {
                    println!("Goodbye! 👋");
                    break;
                }
                "clear" => {
                    self.clear_history();
                    ui::print_step("Conversation cleared.");
                    continue;
                }
                _ => {}
            }

            let spinner = ui::spinner("Thinking");
            let reply = self.run_once(input).await;
            spinner.finish_and_clear();

            match reply.outcome {
                Outcome::Answered => println!("\n{}: {}", name.green().bold(), reply.content),
                Outcome::Fallback | Outcome::ToolLoopExceeded => ui::print_error(&reply.content),
            }
        }

        Ok(())
    }

    /// Clear conversation history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Current transcript.
    pub fn history(&self) -> &[Message] {
        &self.history
    }
}
