//! # homework-bot CLI
//!
//! Polls the homework review API and relays status changes to a Telegram chat.
//!
//! Usage:
//!   homework-bot                       # Poll forever (same as `run`)
//!   homework-bot run --interval 300    # Poll forever with a custom period
//!   homework-bot once                  # Single poll cycle
//!   homework-bot check                 # Verify credentials and bot token
//!   homework-bot config show           # Show effective configuration
//!
//! Secrets come from PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID
//! (a `.env` file in the working directory is honoured).

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hwbot_channels::{Notifier, TelegramChannel, TelegramConfig};
use hwbot_core::{BotConfig, Credentials};
use hwbot_practicum::PracticumClient;
use hwbot_scheduler::PollEngine;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "homework-bot",
    version,
    about = "📚 Homework Bot — homework review statuses in your Telegram chat"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the review API until stopped
    Run {
        /// Seconds between polls (overrides retry_period_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Run a single poll cycle and exit
    Once,

    /// Check credentials and the bot token
    Check,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        "homework_bot=debug,hwbot_core=debug,hwbot_practicum=debug,hwbot_channels=debug,hwbot_scheduler=debug"
    } else {
        "homework_bot=info,hwbot_core=info,hwbot_practicum=info,hwbot_channels=info,hwbot_scheduler=info"
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Read secrets or terminate: nothing can be reported without them.
fn require_credentials() -> Credentials {
    match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("{e}. The bot cannot start.");
            std::process::exit(1);
        }
    }
}

fn build_engine(config: &BotConfig, credentials: &Credentials) -> Result<PollEngine> {
    let source = PracticumClient::new(config, credentials)?;
    let channel = TelegramChannel::new(TelegramConfig::from_bot_config(config, credentials))?;
    let notifier = Notifier::new(Box::new(channel), credentials.telegram_chat_id.clone());
    let started_at = chrono::Utc::now().timestamp();

    Ok(PollEngine::new(Box::new(source), notifier, config, started_at))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring .env file: {e}"),
    }

    // Load config
    let mut config = if let Some(path) = &cli.config {
        BotConfig::load_from(std::path::Path::new(&expand_path(path)))?
    } else {
        BotConfig::load()?
    };

    match cli.command.unwrap_or(Commands::Run { interval: None }) {
        Commands::Run { interval } => {
            if let Some(secs) = interval {
                config.retry_period_secs = secs;
                config.validate()?;
            }
            let credentials = require_credentials();
            let mut engine = build_engine(&config, &credentials)?;

            tokio::select! {
                _ = engine.run() => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping poll loop");
                }
            }
        }

        Commands::Once => {
            let credentials = require_credentials();
            let mut engine = build_engine(&config, &credentials)?;
            let outcome = engine.run_cycle().await;
            println!("{outcome:?}");
        }

        Commands::Check => {
            let credentials = require_credentials();
            println!("✅ {credentials:?}");

            let telegram = TelegramChannel::new(TelegramConfig::from_bot_config(&config, &credentials))?;
            let me = telegram.get_me().await?;
            println!(
                "✅ Telegram bot: {} (@{}, id {})",
                me.first_name,
                me.username.as_deref().unwrap_or("-"),
                me.id
            );
            println!("   Endpoint: {}", config.endpoint);
            println!("   Chat: {}", credentials.telegram_chat_id);
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)?;
                println!("{content}");
            }
        },
    }

    Ok(())
}
