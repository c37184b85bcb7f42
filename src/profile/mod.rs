//! Persona profile and the system instruction built from it.
//!
//! The instruction is assembled once per session from the persona's name
//! and two free-text documents: a short summary and a longer profile
//! (typically an exported LinkedIn PDF).

mod loader;

pub use loader::load_document;

use crate::config::Config;

/// Stands in for a missing summary document.
pub const SUMMARY_PLACEHOLDER: &str = "Summary not available";

/// Stands in for a missing profile document.
pub const PROFILE_PLACEHOLDER: &str = "LinkedIn profile not available";

/// The person the assistant speaks for.
#[derive(Debug, Clone, Default)]
pub struct Persona {
    pub name: String,
    pub summary: Option<String>,
    pub profile: Option<String>,
}

impl Persona {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Load the persona's documents from the configured paths.
    ///
    /// Never fails: unreadable documents are logged and left empty.
    pub fn load(config: &Config) -> Self {
        Self {
            name: config.name.clone(),
            summary: load_document(&config.documents.summary),
            profile: load_document(&config.documents.profile),
        }
    }
}

/// Fixed system instruction for one persona.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    name: String,
    system_prompt: String,
}

impl ProfileContext {
    pub fn new(persona: &Persona) -> Self {
        Self {
            name: persona.name.clone(),
            system_prompt: build_system_prompt(persona),
        }
    }

    /// Persona name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full system instruction.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

fn build_system_prompt(persona: &Persona) -> String {
    let name = &persona.name;
    let summary = persona.summary.as_deref().unwrap_or(SUMMARY_PLACEHOLDER);
    let profile = persona.profile.as_deref().unwrap_or(PROFILE_PLACEHOLDER);

    let mut prompt = String::with_capacity(2048 + summary.len() + profile.len());

    prompt.push_str(&format!(
        "You are acting as {name}. You are answering questions on {name}'s website, \
particularly questions related to {name}'s career, background, skills and experience. \
Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
You are given a summary of {name}'s background and LinkedIn profile which you can use to answer questions. \
Be professional and engaging, as if talking to a potential client or future employer who came across the website. \
If the user asks about something that is not related to {name}'s career, background, skills and experience, \
tell them you are not sure about the answer and offer to pass the question on to {name}. \
If you don't know the answer to any question, use your record_unknown_question tool to record the question \
that you couldn't answer, even if it's about something trivial or unrelated to career. \
If the user wants to get in touch with {name}, ask for their email and record it using your \
record_user_details tool before continuing. \
If the user is engaging in discussion, try to steer them towards getting in touch via email; \
ask for their email and record it using your record_user_details tool."
    ));

    prompt.push_str(&format!(
        "\n\n## Summary:\n{summary}\n\n## LinkedIn Profile:\n{profile}\n\n"
    ));
    prompt.push_str(&format!(
        "With this context, please chat with the user, always staying in character as {name}."
    ));
    prompt
}
