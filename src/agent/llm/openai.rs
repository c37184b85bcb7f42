//! Chat-completions client for OpenAI-compatible endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::Error;
use crate::tools::ToolDefinition;
use crate::Result;

use super::super::message::{Message, Role, ToolCallRequest};
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, WireFunction, WireFunctionCall, WireMessage,
    WireTool, WireToolCall,
};
use super::{FinishReason, LlmClient, LlmResponse, Usage};

/// Client for any endpoint speaking the chat-completions protocol.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiCompatClient {
    /// Create a client with an explicit request timeout.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    fn build_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn convert_messages<'a>(&self, messages: &'a [Message]) -> Vec<WireMessage<'a>> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "tool",
                },
                content: m.content.as_deref(),
                tool_call_id: m.tool_call_id.as_deref(),
                tool_calls: m.tool_calls.as_ref().map(|calls| {
                    calls
                        .iter()
                        .map(|tc| WireToolCall {
                            id: &tc.id,
                            kind: "function",
                            function: WireFunctionCall {
                                name: &tc.name,
                                arguments: &tc.arguments,
                            },
                        })
                        .collect()
                }),
            })
            .collect()
    }

    fn convert_tools<'a>(&self, tools: &'a [ToolDefinition]) -> Vec<WireTool<'a>> {
        tools
            .iter()
            .map(|t| WireTool {
                kind: "function",
                function: WireFunction {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.parameters,
                },
            })
            .collect()
    }

    fn parse_response(&self, response: ChatCompletionResponse) -> Result<LlmResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("No choices in response".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCallRequest {
                // Some compatible endpoints omit ids; the tool result must still pair up.
                id: tc
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple())),
                name: tc.function.name,
                arguments: tc.function.arguments.unwrap_or_default(),
            })
            .collect();

        let usage = response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens.unwrap_or(0),
                completion_tokens: u.completion_tokens.unwrap_or(0),
                total_tokens: u.total_tokens.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content: choice.message.content,
            tool_calls,
            finish_reason: FinishReason::from_wire(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: self.convert_messages(messages),
            tools: self.convert_tools(tools),
        };

        let response = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(Error::Llm(format!("API error ({status}): {error_text}")));
        }

        let body: ChatCompletionResponse = response.json().await?;
        let parsed = self.parse_response(body)?;
        debug!(
            finish_reason = ?parsed.finish_reason,
            tool_calls = parsed.tool_calls.len(),
            total_tokens = parsed.usage.total_tokens,
            "model responded"
        );
        Ok(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> OpenAiCompatClient {
        OpenAiCompatClient::new(
            "https://example.test/v1/",
            "key",
            "test-model",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        assert_eq!(client().build_url(), "https://example.test/v1/chat/completions");
    }

    #[test]
    fn test_request_serialization() {
        let client = client();
        let call = ToolCallRequest::new("call_1", "record_unknown_question", &json!({"question": "Q"}));
        let messages = vec![
            Message::system("persona"),
            Message::user("hi"),
            Message::assistant_with_tools(None, vec![call]),
            Message::tool_result("call_1", &json!({"recorded": "ok"})),
        ];
        let tools = vec![ToolDefinition {
            name: "record_unknown_question".to_string(),
            description: "Record a question".to_string(),
            parameters: json!({"type": "object"}),
        }];

        let request = ChatCompletionRequest {
            model: client.model(),
            messages: client.convert_messages(&messages),
            tools: client.convert_tools(&tools),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "test-model");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][2]["content"], serde_json::Value::Null);
        assert_eq!(value["messages"][2]["tool_calls"][0]["type"], "function");
        assert_eq!(
            value["messages"][2]["tool_calls"][0]["function"]["arguments"],
            r#"{"question":"Q"}"#
        );
        assert_eq!(value["messages"][3]["tool_call_id"], "call_1");
        assert_eq!(value["tools"][0]["function"]["name"], "record_unknown_question");
    }

    #[test]
    fn test_empty_tool_list_is_omitted() {
        let client = client();
        let messages = vec![Message::user("hi")];
        let request = ChatCompletionRequest {
            model: client.model(),
            messages: client.convert_messages(&messages),
            tools: client.convert_tools(&[]),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "call_a", "type": "function",
                         "function": {"name": "record_user_details", "arguments": "{\"email\":\"a@b.c\"}"}},
                        {"type": "function",
                         "function": {"name": "record_unknown_question", "arguments": "{}"}}
                    ]
                }
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();

        let response = client().parse_response(body).unwrap();
        assert!(response.wants_tools());
        assert_eq!(response.tool_calls[0].id, "call_a");
        assert_eq!(response.tool_calls[0].arguments, r#"{"email":"a@b.c"}"#);
        assert!(response.tool_calls[1].id.starts_with("call_"));
        assert_ne!(response.tool_calls[1].id, "call_a");
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[test]
    fn test_parse_final_answer() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"finish_reason": "stop", "message": {"content": "Hello"}}]
        }))
        .unwrap();

        let response = client().parse_response(body).unwrap();
        assert!(!response.wants_tools());
        assert_eq!(response.content.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_parse_null_tool_calls() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "stop",
                "message": {"content": "Hello", "tool_calls": null}
            }]
        }))
        .unwrap();

        let response = client().parse_response(body).unwrap();
        assert!(!response.wants_tools());
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.content.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_parse_null_arguments() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "content": null,
                    "tool_calls": [{"id": "call_n", "type": "function",
                                    "function": {"name": "record_unknown_question", "arguments": null}}]
                }
            }]
        }))
        .unwrap();

        let response = client().parse_response(body).unwrap();
        assert_eq!(response.tool_calls[0].arguments, "");
        assert_eq!(response.tool_calls[0].parse_arguments().unwrap(), json!({}));
    }

    #[test]
    fn test_parse_rejects_empty_choices() {
        let body: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(client().parse_response(body), Err(Error::Llm(_))));
    }
}
