use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::{BotError, ConfigError, DispatchError};
use application::messaging::{Dispatched, MessageDispatcher};
use application::services::CommandResponder;
use domain::entities::InboundMessage;
use domain::traits::Bot;
use infrastructure::adapters::console::CONSOLE_CHAT_ID;
use infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use infrastructure::config::{Config, Settings};

#[derive(Parser)]
#[command(name = "mines-calculator-bot")]
#[command(about = "Telegram bot that opens the Mines payout calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Run,
    /// Talk to the bot on stdin (dev mode)
    Console {
        /// Reject web app buttons like a group chat that doesn't support them
        #[arg(long)]
        reject_web_app: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Console { reject_web_app } => {
            run_console(cli.config, reject_web_app);
        }
        Commands::Version => {
            println!("mines-calculator-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

/// Log a configuration error and stop before anything touches the network
fn fatal(error: ConfigError) -> ! {
    tracing::error!("Configuration error: {}", error);
    std::process::exit(1);
}

fn load_config(config_path: &str, token_override: Option<String>) -> Config {
    let mut config = Config::load_or_default(config_path).unwrap_or_else(|e| fatal(e));
    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }
    config
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        tracing::error!("Failed to start async runtime: {}", e);
        std::process::exit(1);
    })
}

fn run_bot(config_path: String, token_override: Option<String>) {
    let config = load_config(&config_path, token_override);
    let settings = config.resolve().unwrap_or_else(|e| fatal(e));

    tracing::info!("Starting {}", config.bot.name);

    if let Err(e) = runtime().block_on(run_telegram_bot(settings)) {
        tracing::error!("Bot stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run_telegram_bot(settings: Settings) -> Result<(), BotError> {
    let mut bot = TelegramAdapter::new(settings.token.as_str());
    tracing::info!("Starting Telegram bot (token: {}...)", bot.token_hint());

    bot.fetch_bot_info().await?;
    let info = bot.bot_info();
    tracing::info!("Bot started: {} (@{}, id {})", info.name, info.username, info.id);

    if settings.register_commands {
        if let Err(e) = bot.register_commands().await {
            tracing::warn!("Failed to register commands: {}", e);
        }
    }

    let bot = Arc::new(bot);
    let dispatcher = MessageDispatcher::new(bot.clone(), CommandResponder::new(settings.webapp_url));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                return Ok(());
            }
            result = bot.get_updates(offset, settings.poll_timeout) => match result {
                Ok(updates) => {
                    if !updates.is_empty() {
                        tracing::debug!("Received {} updates", updates.len());
                    }
                    for raw in &updates {
                        match TelegramAdapter::decode_update(raw) {
                            Ok(Some(message)) => {
                                dispatcher.dispatch(message).await;
                            }
                            Ok(None) => {}
                            Err(fault) => {
                                dispatcher.handle_fault(&fault, TelegramAdapter::chat_id_hint(raw)).await;
                            }
                        }
                    }

                    offset = TelegramAdapter::get_next_offset(&updates, offset);
                }
                Err(e) => {
                    dispatcher.handle_fault(&DispatchError::Transport(e), None).await;
                    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                }
            }
        }
    }
}

fn run_console(config_path: String, reject_web_app: bool) {
    let config = load_config(&config_path, None);
    let webapp_url = config.webapp_url().unwrap_or_else(|e| fatal(e));

    runtime().block_on(async {
        let bot = Arc::new(ConsoleAdapter::new().with_web_app_rejection(reject_web_app));
        let dispatcher = MessageDispatcher::new(bot.clone(), CommandResponder::new(webapp_url));

        tracing::info!("Starting console bot (dev mode), Ctrl-D to quit");

        while let Some(input) = bot.read_line("> ").await {
            if input.is_empty() {
                continue;
            }

            let message = InboundMessage::new(CONSOLE_CHAT_ID, input);
            if dispatcher.dispatch(message).await == Dispatched::NotACommand {
                println!("[BOT] Unknown command. Try /help");
            }
        }
    });
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            tracing::error!("Failed to render default config: {}", e);
            std::process::exit(1);
        }
    }
}
