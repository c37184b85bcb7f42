//! Relay tools - record a visitor's contact details or an unanswered question

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::Tool;
use crate::error::Error;
use crate::notify::{self, Notifier};
use crate::Result;

fn acknowledged() -> Value {
    json!({"recorded": "ok"})
}

fn parse_args<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|source| Error::ToolArguments {
        tool: tool.to_string(),
        source,
    })
}

#[derive(Deserialize)]
struct UserDetailsArgs {
    email: String,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_notes")]
    notes: String,
}

fn default_name() -> String {
    "Name not provided".to_string()
}

fn default_notes() -> String {
    "not provided".to_string()
}

/// Records that a visitor wants to get in touch.
pub struct RecordUserDetailsTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUserDetailsTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn name(&self) -> &str {
        "record_user_details"
    }

    fn description(&self) -> &str {
        "Use this tool to record that a user is interested in being in touch and provided an email address"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "The email address of this user"
                },
                "name": {
                    "type": "string",
                    "description": "The user's name, if they provided it"
                },
                "notes": {
                    "type": "string",
                    "description": "Any additional information about the conversation that's worth recording to give context"
                }
            },
            "required": ["email"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let args: UserDetailsArgs = parse_args(self.name(), params)?;
        let text = format!(
            "Recording {} with email {} and notes {}",
            args.name, args.email, args.notes
        );
        notify::deliver(self.notifier.as_ref(), &text).await;
        Ok(acknowledged())
    }
}

#[derive(Deserialize)]
struct UnknownQuestionArgs {
    question: String,
}

/// Records a question the assistant couldn't answer.
pub struct RecordUnknownQuestionTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUnknownQuestionTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn name(&self) -> &str {
        "record_unknown_question"
    }

    fn description(&self) -> &str {
        "Always use this tool to record any question that couldn't be answered as you didn't know the answer"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that couldn't be answered"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let args: UnknownQuestionArgs = parse_args(self.name(), params)?;
        notify::deliver(self.notifier.as_ref(), &format!("Recording {}", args.question)).await;
        Ok(acknowledged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    #[tokio::test]
    async fn test_user_details_with_defaults() {
        let notifier = Arc::new(RecordingNotifier::new());
        let tool = RecordUserDetailsTool::new(notifier.clone());

        let result = tool.execute(json!({"email": "sam@example.com"})).await.unwrap();

        assert_eq!(result, json!({"recorded": "ok"}));
        assert_eq!(
            notifier.sent(),
            vec!["Recording Name not provided with email sam@example.com and notes not provided"]
        );
    }

    #[tokio::test]
    async fn test_user_details_with_all_fields() {
        let notifier = Arc::new(RecordingNotifier::new());
        let tool = RecordUserDetailsTool::new(notifier.clone());

        tool.execute(json!({"email": "sam@example.com", "name": "Sam", "notes": "hiring"}))
            .await
            .unwrap();

        assert_eq!(
            notifier.sent(),
            vec!["Recording Sam with email sam@example.com and notes hiring"]
        );
    }

    #[tokio::test]
    async fn test_user_details_requires_email() {
        let notifier = Arc::new(RecordingNotifier::new());
        let tool = RecordUserDetailsTool::new(notifier.clone());

        let result = tool.execute(json!({"name": "Sam"})).await;

        assert!(matches!(result, Err(Error::ToolArguments { .. })));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_question() {
        let notifier = Arc::new(RecordingNotifier::new());
        let tool = RecordUnknownQuestionTool::new(notifier.clone());

        let result = tool.execute(json!({"question": "Favourite colour?"})).await.unwrap();

        assert_eq!(result, json!({"recorded": "ok"}));
        assert_eq!(notifier.sent(), vec!["Recording Favourite colour?"]);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_acknowledges() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let tool = RecordUnknownQuestionTool::new(notifier.clone());

        let result = tool.execute(json!({"question": "Q"})).await.unwrap();

        assert_eq!(result, json!({"recorded": "ok"}));
    }
}
