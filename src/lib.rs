//! Envoy - persona chat assistant
//!
//! This library answers questions on someone's behalf: it builds a persona
//! prompt from their summary and profile documents, runs a tool-calling chat
//! loop against a hosted model, and relays contact requests and unanswered
//! questions through a push-notification sink.

pub mod adapters;
pub mod agent;
pub mod config;
pub mod error;
pub mod notify;
pub mod profile;
pub mod templates;
pub mod tools;
pub mod ui;

pub use error::{Error, Result};
