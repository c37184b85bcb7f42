//! Envoy CLI entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use envoy::adapters::{cli::CliChannel, web, ChannelRegistry};
use envoy::agent::ChatSession;
use envoy::config::{self, Config};
use envoy::ui;

#[derive(Parser)]
#[command(name = "envoy")]
#[command(about = "Envoy - answers career questions on your behalf")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ~/.envoy/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a configuration interactively
    Onboard,

    /// Chat in the terminal
    Chat {
        /// Send one message and print the reply
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Serve the web chat page
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envoy=info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::config_path);

    match cli.command {
        Commands::Onboard => {
            config::onboard(&config_path)?;
        }

        Commands::Chat { message } => {
            let config = config::load_from(&config_path)?;
            let session = ChatSession::from_config(&config)?;
            let mut channel = CliChannel::new(session).with_greeting(config.greeting.clone());

            if let Some(msg) = message {
                let reply = channel.run_once(&msg).await;
                println!("{}", reply.content);
            } else {
                install_ctrlc_handler();
                ui::print_header(&format!("Chatting as {}", config.name), &describe(&config));
                println!("  Type 'clear' to reset the conversation, 'exit' to quit.");
                channel.run_interactive().await?;
            }
        }

        Commands::Serve { host, port } => {
            let config = config::load_from(&config_path)?;
            let session = Arc::new(ChatSession::from_config(&config)?);
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            ui::print_header(&format!("Web chat for {}", config.name), &describe(&config));
            ui::print_step(&format!("Open http://{host}:{port} in your browser"));
            web::serve(session, web::PageOptions::from_config(&config), &host, port).await?;
        }

        Commands::Status => {
            let config = config::load_from(&config_path)?;
            print_status(&config, &config_path);
        }
    }

    Ok(())
}

fn describe(config: &Config) -> String {
    format!("{}  •  {}", config.model, config.provider)
}

fn print_status(config: &Config, path: &std::path::Path) {
    ui::print_header("Status", &describe(config));

    let file_state = if path.exists() { "found" } else { "not found, using defaults" };
    ui::print_step(&format!("Config: {} ({file_state})", path.display()));
    ui::print_step(&format!("Persona: {}", config.name));

    if config.api_key.is_empty() {
        let env = config.api_key_env().unwrap_or("api_key");
        ui::print_warning(&format!("API key not set (config or {env})"));
    } else {
        ui::print_success("API key set");
    }

    for (label, doc) in [
        ("Summary", &config.documents.summary),
        ("Profile", &config.documents.profile),
    ] {
        if doc.exists() {
            ui::print_success(&format!("{label}: {}", doc.display()));
        } else {
            ui::print_warning(&format!("{label}: {} missing, placeholder will be used", doc.display()));
        }
    }

    if config.pushover.is_configured() {
        ui::print_success("Pushover notifications enabled");
    } else {
        ui::print_warning("Pushover not configured; notifications go to the log");
    }

    ui::print_step(&format!("Tool rounds per turn: {}", config.max_tool_rounds));
    ui::print_step(&format!("Request timeout: {}s", config.request_timeout_secs));
    for name in ChannelRegistry::available() {
        ui::print_step(&format!("Channel {name}: {}", ChannelRegistry::description(name)));
    }
}

/// First Ctrl+C warns, a second one within three seconds exits.
fn install_ctrlc_handler() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let armed = Arc::new(AtomicBool::new(false));
    let flag = armed.clone();

    let installed = ctrlc::set_handler(move || {
        if flag.load(Ordering::SeqCst) {
            println!("\n👋 Bye!");
            std::process::exit(0);
        }
        println!("\n⚠️  Press Ctrl+C again to exit");
        flag.store(true, Ordering::SeqCst);

        let reset = flag.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_secs(3));
            reset.store(false, Ordering::SeqCst);
        });
    });

    if let Err(e) = installed {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }
}
