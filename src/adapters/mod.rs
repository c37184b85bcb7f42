//! Adapters module — ways to talk to the assistant.
//!
//! # Supported Channels
//!
//! - **CLI** — single message or interactive terminal chat
//! - **Web** — browser chat page and JSON endpoint via axum
//!
//! Both hold the transcript on the caller's side and pass it to
//! [`ChatSession::ask`](crate::agent::ChatSession::ask) on every turn.

pub mod cli;
pub mod web;

/// Channel registry — metadata about available channels.
pub struct ChannelRegistry;

impl ChannelRegistry {
    /// List all available channel names.
    pub fn available() -> &'static [&'static str] {
        &["cli", "web"]
    }

    /// Get a human-readable description of a channel.
    pub fn description(name: &str) -> &'static str {
        match name {
            "cli" => "Interactive command line interface",
            "web" => "Browser chat page served over HTTP",
            _ => "Unknown channel",
        }
    }
}
