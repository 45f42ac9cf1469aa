//! Message Handler module for turning incoming Telegram messages into
//! conversation events

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::prelude::*;
use teloxide::types::{FileId, UserId};
use tracing::debug;

use crate::dialogue::{ConversationState, Event, MediaKind};

use super::context::AppContext;
use super::dialogue_manager::{handle_event, Inbound};
use super::Command;

/// Stable identifier of the sender, falling back to the chat id
pub fn sender_id(msg: &Message) -> String {
    msg.from
        .as_ref()
        .map(|user| user.id.to_string())
        .unwrap_or_else(|| msg.chat.id.to_string())
}

/// Session key for a sender
///
/// Conversations belong to users, not chats: two members of one group each
/// walk their own menu. Messages without a sender fall back to the chat.
pub fn session_key(sender: Option<UserId>, chat_id: ChatId) -> ChatId {
    sender.map(ChatId::from).unwrap_or(chat_id)
}

/// Describe where a message came from
pub fn inbound(msg: &Message) -> Inbound {
    Inbound {
        chat_id: msg.chat.id,
        user_id: sender_id(msg),
        session: session_key(msg.from.as_ref().map(|user| user.id), msg.chat.id),
        file: media_file(msg).map(|(_, file_id)| file_id),
    }
}

/// Kind and file of an uploaded photo, video or document
///
/// For photos the largest available size is used.
pub fn media_file(msg: &Message) -> Option<(MediaKind, FileId)> {
    if let Some(photos) = msg.photo() {
        return photos
            .last()
            .map(|photo| (MediaKind::Photo, photo.file.id.clone()));
    }
    if let Some(video) = msg.video() {
        return Some((MediaKind::Video, video.file.id.clone()));
    }
    msg.document()
        .map(|document| (MediaKind::Document, document.file.id.clone()))
}

/// Classify a plain text message
///
/// Commands reach this point only when they are not ours (or carry another
/// bot's username), so they are treated as unsupported input.
pub fn text_event(text: &str) -> Event {
    if text.trim_start().starts_with('/') {
        Event::Unsupported
    } else {
        Event::Text(text.to_string())
    }
}

/// Map a message onto a conversation event
pub fn event_from_message(msg: &Message) -> Event {
    if let Some(text) = msg.text() {
        return text_event(text);
    }
    match media_file(msg) {
        Some((kind, _)) => Event::Media(kind),
        None => Event::Unsupported,
    }
}

pub fn command_event(cmd: &Command) -> Event {
    match cmd {
        Command::Start => Event::Start,
        Command::Help => Event::Help,
        Command::Cancel => Event::Cancel,
    }
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    storage: Arc<InMemStorage<ConversationState>>,
    ctx: Arc<AppContext>,
) -> Result<()> {
    let inbound = inbound(&msg);
    debug!(user_id = %inbound.user_id, command = ?cmd, "Received command");
    let dialogue = Dialogue::new(storage, inbound.session);
    handle_event(&bot, &inbound, dialogue, &ctx, command_event(&cmd)).await
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    storage: Arc<InMemStorage<ConversationState>>,
    ctx: Arc<AppContext>,
) -> Result<()> {
    let inbound = inbound(&msg);
    let event = event_from_message(&msg);
    debug!(user_id = %inbound.user_id, event = ?event, "Received message");
    let dialogue = Dialogue::new(storage, inbound.session);
    handle_event(&bot, &inbound, dialogue, &ctx, event).await
}
