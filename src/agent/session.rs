//! Chat session - one persona, one tool registry, stateless across turns
//!
//! Each turn sends the persona instruction, the caller's transcript and the
//! new message to the model, runs whatever tools the model asks for, and
//! repeats until the model answers in plain text.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::notify;
use crate::profile::{Persona, ProfileContext};
use crate::tools::{self, ToolRegistry};
use crate::Result;

use super::llm::{LlmClient, ProviderRegistry};
use super::message::Message;

/// Reply given when a turn fails for any reason other than the tool cap.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, the system is currently experiencing an issue. Please try again in a moment.";

/// Reply given when the model keeps asking for tools past the cap.
pub const TOOL_LOOP_MESSAGE: &str =
    "Sorry, I couldn't finish working through that question. Could you try asking it another way?";

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Answered,
    Fallback,
    ToolLoopExceeded,
}

/// What the caller shows the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub outcome: Outcome,
}

impl Reply {
    fn answered(content: String) -> Self {
        Self {
            content,
            outcome: Outcome::Answered,
        }
    }

    fn fallback() -> Self {
        Self {
            content: FALLBACK_MESSAGE.to_string(),
            outcome: Outcome::Fallback,
        }
    }

    fn tool_loop_exceeded() -> Self {
        Self {
            content: TOOL_LOOP_MESSAGE.to_string(),
            outcome: Outcome::ToolLoopExceeded,
        }
    }
}

/// Runs the request/response/tool-dispatch loop for one persona.
pub struct ChatSession<C: LlmClient> {
    client: C,
    context: ProfileContext,
    tools: ToolRegistry,
    max_tool_rounds: usize,
}

impl ChatSession<Box<dyn LlmClient>> {
    /// Wire up provider, notifier, tools and persona from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ProviderRegistry::create(config)?;
        let notifier = notify::from_config(config)?;
        let tools = tools::default_registry(notifier)?;
        let context = ProfileContext::new(&Persona::load(config));
        Ok(Self::new(client, context, tools, config.max_tool_rounds))
    }
}

impl<C: LlmClient> ChatSession<C> {
    pub fn new(client: C, context: ProfileContext, tools: ToolRegistry, max_tool_rounds: usize) -> Self {
        Self {
            client,
            context,
            tools,
            max_tool_rounds,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn profile(&self) -> &ProfileContext {
        &self.context
    }

    /// Answer `message` given the prior `transcript`.
    ///
    /// Never fails: errors become a fixed reply and a log event.
    pub async fn ask(&self, message: &str, transcript: &[Message]) -> Reply {
        match self.run_turn(message, transcript).await {
            Ok(content) => Reply::answered(content),
            Err(Error::ToolLoopExceeded(rounds)) => {
                warn!(max_rounds = rounds, "model kept requesting tools; turn abandoned");
                Reply::tool_loop_exceeded()
            }
            Err(e) => {
                error!(error = %e, "chat turn failed");
                Reply::fallback()
            }
        }
    }

    /// Run one turn, returning the model's final answer.
    pub async fn run_turn(&self, message: &str, transcript: &[Message]) -> Result<String> {
        let mut messages = self.build_messages(transcript, message);
        let tools = self.tools.definitions();

        debug!(history = transcript.len(), model = self.client.model(), "starting turn");

        for round in 0..=self.max_tool_rounds {
            let response = self.client.chat(&messages, &tools).await?;

            if !response.wants_tools() {
                let content = response.content.unwrap_or_default();
                info!(rounds = round, chars = content.len(), "turn completed");
                return Ok(content);
            }

            if round == self.max_tool_rounds {
                break;
            }

            let calls = response.tool_calls;
            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                info!(tool = %call.name, call_id = %call.id, round = round + 1, "tool called");
                let result = self.tools.dispatch(call).await?;
                results.push(Message::tool_result(&call.id, &result));
            }

            messages.push(Message::assistant_with_tools(response.content, calls));
            messages.extend(results);
        }

        Err(Error::ToolLoopExceeded(self.max_tool_rounds))
    }

    /// System instruction, carried-over transcript, then the new message.
    pub fn build_messages(&self, transcript: &[Message], current: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(transcript.len() + 2);
        messages.push(Message::system(self.context.system_prompt()));
        messages.extend(transcript.iter().filter_map(Message::carry_over));
        messages.push(Message::user(current));
        messages
    }
}
