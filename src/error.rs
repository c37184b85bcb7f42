//! Error types for Envoy

use thiserror::Error;

/// Result type alias for Envoy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Envoy
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid arguments for tool '{tool}': {source}")]
    ToolArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Tool loop exceeded {0} rounds")]
    ToolLoopExceeded(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
