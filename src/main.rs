use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use social_autopilot::bot::{schema, AppContext, Command};
use social_autopilot::config::BotConfig;
use social_autopilot::dialogue::ConversationState;
use social_autopilot::errors::ConfigError;
use social_autopilot::logging::init_logging;
use social_autopilot::profile_store::{JsonFileProfileStore, ProfileStore};
use social_autopilot::staging::StagingArea;
use social_autopilot::suggestions::ContentSuggester;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e @ (ConfigError::MissingToken | ConfigError::PlaceholderToken)) => {
            eprintln!("Please set the TELEGRAM_BOT_TOKEN environment variable ({e})");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Keep the guard alive so the log file is flushed on shutdown
    let _log_guard = init_logging(&config.logging)?;

    info!(config = ?config, "Starting Social Media Automation Bot");

    let profiles: Arc<dyn ProfileStore> =
        Arc::new(JsonFileProfileStore::open(&config.profile_store_path));
    let ctx = Arc::new(AppContext::new(
        profiles,
        ContentSuggester::from_entropy(),
        StagingArea::new(&config.staging_dir),
        config.youtube_delay,
    ));

    let bot = Bot::new(config.token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![InMemStorage::<ConversationState>::new(), ctx])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
