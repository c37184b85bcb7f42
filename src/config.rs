//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Error;
use crate::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the person the assistant speaks for
    #[serde(default = "default_name")]
    pub name: String,

    /// LLM provider to use ("gemini" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key for the provider
    #[serde(default)]
    pub api_key: String,

    /// Override for the provider's chat-completions base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum model round-trips spent on tool calls in one turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,

    /// Timeout for every outbound HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Persona documents
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Pushover notification credentials
    #[serde(default)]
    pub pushover: PushoverConfig,

    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Opening assistant message shown before the visitor types anything
    #[serde(default)]
    pub greeting: Option<String>,

    /// Contact links shown beside the web chat (booking page, LinkedIn, ...)
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A labelled external link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Paths to the documents the persona prompt is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_summary_path")]
    pub summary: PathBuf,

    #[serde(default = "default_profile_path")]
    pub profile: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushoverConfig {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub user: String,
}

impl PushoverConfig {
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.user.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_name() -> String {
    "Me".to_string()
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_tool_rounds() -> usize {
    8
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_summary_path() -> PathBuf {
    PathBuf::from("me").join("summary.txt")
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("me").join("linkedin.pdf")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            summary: default_summary_path(),
            profile: default_profile_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            provider: default_provider(),
            api_key: String::new(),
            base_url: None,
            model: default_model(),
            max_tool_rounds: default_max_tool_rounds(),
            request_timeout_secs: default_request_timeout_secs(),
            documents: DocumentsConfig::default(),
            pushover: PushoverConfig::default(),
            server: ServerConfig::default(),
            greeting: None,
            links: Vec::new(),
        }
    }
}

impl Config {
    /// Environment variable holding the API key for the configured provider
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self.provider.as_str() {
            "gemini" => Some("GOOGLE_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            _ => None,
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = self.api_key_env().and_then(|k| get(k)) {
            self.api_key = key;
        }
        if let Some(token) = get("PUSHOVER_TOKEN") {
            self.pushover.token = token;
        }
        if let Some(user) = get("PUSHOVER_USER") {
            self.pushover.user = user;
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".envoy")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default path
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

/// Load configuration from `path`, falling back to defaults when the file
/// doesn't exist, then apply environment overrides.
pub fn load_from(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config at {}: {e}", path.display())))?
    } else {
        info!(path = %path.display(), "no config file; using defaults");
        Config::default()
    };

    config.apply_env();
    Ok(config)
}

/// Save configuration to the default path
pub fn save(config: &Config) -> Result<()> {
    save_to(config, &config_path())
}

/// Save configuration to `path`
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Interactive setup wizard
pub fn onboard(path: &Path) -> Result<()> {
    use crate::agent::ProviderRegistry;
    use crate::ui;
    use inquire::{Confirm, Select, Text};

    let prompt_err = |e: inquire::InquireError| Error::Config(format!("Prompt failed: {e}"));

    ui::print_header("Setup Wizard", "local");
    println!("  Let's get your assistant configured.\n");

    let mut config = Config::default();

    // 1. Persona
    config.name = Text::new("Whose assistant is this? (your name)")
        .prompt()
        .map_err(prompt_err)?;

    // 2. Provider
    let provider = Select::new("Choose your AI provider:", ProviderRegistry::available().to_vec())
        .prompt()
        .map_err(prompt_err)?;
    config.provider = provider.to_string();
    if config.provider == "openai" {
        config.model = "gpt-4o-mini".to_string();
    }

    let env_hint = config.api_key_env().unwrap_or("the environment");
    config.api_key = Text::new("Enter your API key:")
        .with_help_message(&format!("Leave empty to read it from {env_hint} instead"))
        .prompt()
        .map_err(prompt_err)?;

    // 3. Documents
    ui::print_step(&format!(
        "Documents default to {} and {}",
        config.documents.summary.display(),
        config.documents.profile.display()
    ));
    let keep_docs = Confirm::new("Use the default document paths?")
        .with_default(true)
        .prompt()
        .map_err(prompt_err)?;

    if !keep_docs {
        let summary = Text::new("Path to your summary (text):")
            .prompt()
            .map_err(prompt_err)?;
        let profile = Text::new("Path to your profile (PDF or text):")
            .prompt()
            .map_err(prompt_err)?;
        config.documents.summary = PathBuf::from(summary);
        config.documents.profile = PathBuf::from(profile);
    }

    // 4. Notifications (optional)
    let wants_push = Confirm::new("Set up Pushover notifications?")
        .with_default(false)
        .prompt()
        .map_err(prompt_err)?;

    if wants_push {
        config.pushover.token = Text::new("Pushover application token:")
            .prompt()
            .map_err(prompt_err)?;
        config.pushover.user = Text::new("Pushover user key:")
            .prompt()
            .map_err(prompt_err)?;
    }

    // 5. Greeting (optional)
    let greeting = Text::new("Opening message (leave empty for none):")
        .prompt()
        .map_err(prompt_err)?;
    let greeting = greeting.trim();
    if !greeting.is_empty() {
        config.greeting = Some(greeting.to_string());
    }

    // 6. Save
    ui::print_thinking("Saving configuration");
    save_to(&config, path)?;

    println!();
    ui::print_success("Setup complete!");
    ui::print_step("Run 'envoy chat' or 'envoy serve' to start.");

    Ok(())
}
