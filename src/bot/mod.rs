//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Turns commands and messages into conversation events
//! - `dialogue_manager`: Runs transitions and executes their effects
//! - `ui_builder`: Creates keyboards and formats replies
//! - `context`: Shared state injected into every handler

pub mod context;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

pub use context::AppContext;
pub use dialogue_manager::{handle_event, ChatIo, Inbound};
pub use message_handler::{command_handler, message_handler};

/// Commands exposed to Telegram users
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "begin setup and niche selection.")]
    Start,
    #[command(description = "show this help message.")]
    Help,
    #[command(description = "end the current conversation.")]
    Cancel,
}

/// Dispatcher tree: our commands first, every other message second
///
/// Handlers expect an `Arc<InMemStorage<ConversationState>>` and an
/// `Arc<AppContext>` in the dependency map.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(dptree::endpoint(message_handler))
}
