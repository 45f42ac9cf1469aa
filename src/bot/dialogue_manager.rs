//! Dialogue Manager module: runs the state machine for one event and carries
//! out the resulting effects

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::{debug, error, info, warn};

use crate::dialogue::{transition, ConversationDialogue, Effect, Event, MediaKind};
use crate::localization::t;
use crate::niche::Niche;
use crate::suggestions::ContentHint;

use super::context::AppContext;
use super::ui_builder::{main_menu_reply, render, upload_result_text, youtube_result_text, Reply};

/// Outgoing side of the conversation: replies and file downloads
///
/// Implemented by [`Bot`]; handlers only ever talk to Telegram through it.
pub trait ChatIo: Clone + Send + Sync + 'static {
    fn send(&self, chat_id: ChatId, reply: Reply) -> impl Future<Output = Result<()>> + Send;

    fn download(&self, file_id: FileId) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

impl ChatIo for Bot {
    fn send(&self, chat_id: ChatId, reply: Reply) -> impl Future<Output = Result<()>> + Send {
        send_reply(self, chat_id, reply)
    }

    fn download(&self, file_id: FileId) -> impl Future<Output = Result<Vec<u8>>> + Send {
        crate::staging::download_file(self, file_id)
    }
}

/// Send a reply, attaching its keyboard change if any
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<()> {
    let request = bot.send_message(chat_id, reply.text);
    match reply.markup {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };
    Ok(())
}

/// Where an event came from
#[derive(Debug, Clone)]
pub struct Inbound {
    /// Chat that receives the replies
    pub chat_id: ChatId,
    /// Profile key of the sender
    pub user_id: String,
    /// Key of the sender's conversation session and pending jobs
    pub session: ChatId,
    /// File attached to the message, if any
    pub file: Option<FileId>,
}

/// Whether the remaining effects of a transition should run
enum Flow {
    Continue,
    /// Abort the transition and keep the user in the current state
    Stay,
}

/// Feed one event to the state machine and apply the outcome
///
/// A reply that cannot be delivered is logged and the remaining effects
/// still run, so the stored state always matches what was persisted.
pub async fn handle_event<C: ChatIo>(
    io: &C,
    inbound: &Inbound,
    dialogue: ConversationDialogue,
    ctx: &Arc<AppContext>,
    event: Event,
) -> Result<()> {
    let current = dialogue.get().await?;
    let known_niche = ctx.profiles.get(&inbound.user_id);

    let outcome = transition(current.as_ref(), &event, known_niche);
    debug!(
        user_id = %inbound.user_id,
        from = ?current,
        to = ?outcome.next,
        event = ?event,
        "Conversation transition"
    );

    let mut next = outcome.next;
    for effect in outcome.effects {
        match execute_effect(io, inbound, ctx, effect).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stay) => {
                next = current.clone();
                break;
            }
            Err(e) => {
                error!(user_id = %inbound.user_id, error = %e, "Failed to deliver reply");
            }
        }
    }

    match (current, next) {
        (_, Some(state)) => dialogue.update(state).await?,
        (Some(_), None) => dialogue.exit().await?,
        (None, None) => {}
    }

    Ok(())
}

async fn execute_effect<C: ChatIo>(
    io: &C,
    inbound: &Inbound,
    ctx: &Arc<AppContext>,
    effect: Effect,
) -> Result<Flow> {
    let chat_id = inbound.chat_id;
    let user_id = inbound.user_id.as_str();

    match effect {
        Effect::SaveNiche(niche) => save_niche(ctx, user_id, niche).await,
        Effect::AcceptUpload(kind) => {
            let Some(file_id) = inbound.file.clone() else {
                io.send(chat_id, Reply::text(t("upload-unsupported"))).await?;
                return Ok(Flow::Stay);
            };

            if let Err(e) = stage_upload(io, ctx, user_id, kind, file_id).await {
                error!(user_id = %user_id, error = %e, "Failed to stage upload");
                io.send(chat_id, Reply::text(t("upload-failed"))).await?;
                return Ok(Flow::Stay);
            }

            let niche = ctx.profiles.get(user_id);
            let suggestion = ctx.suggester.suggest(niche, &ContentHint::Upload(kind));
            io.send(chat_id, Reply::text(upload_result_text(&suggestion))).await?;
        }
        Effect::ProcessYoutubeLink(url) => {
            io.send(chat_id, Reply::text(t("youtube-analyzing"))).await?;
            schedule_youtube_result(io.clone(), inbound, url, ctx);
        }
        other => {
            if other == Effect::Cancelled && ctx.jobs.cancel(&inbound.session) {
                info!(user_id = %user_id, "Pending YouTube processing cancelled");
            }
            let niche = ctx.profiles.get(user_id);
            if let Some(reply) = render(&other, niche) {
                io.send(chat_id, reply).await?;
            }
        }
    }

    Ok(Flow::Continue)
}

/// Persist the niche off the async workers; the file store syncs to disk
async fn save_niche(ctx: &Arc<AppContext>, user_id: &str, niche: Niche) {
    let profiles = Arc::clone(&ctx.profiles);
    let key = user_id.to_string();

    match tokio::task::spawn_blocking(move || profiles.set(&key, niche)).await {
        Ok(Ok(())) => info!(user_id = %user_id, niche = niche.key(), "Niche selected"),
        // The choice is still held in memory for this process
        Ok(Err(e)) => {
            warn!(user_id = %user_id, niche = niche.key(), error = %e, "Failed to persist niche")
        }
        Err(e) => error!(user_id = %user_id, error = %e, "Profile write task failed"),
    }
}

async fn stage_upload<C: ChatIo>(
    io: &C,
    ctx: &AppContext,
    user_id: &str,
    kind: MediaKind,
    file_id: FileId,
) -> Result<()> {
    let bytes = io.download(file_id).await?;
    let path = ctx.staging.write(user_id, kind, &bytes).await?;
    info!(
        user_id = %user_id,
        kind = kind.as_str(),
        path = %path.display(),
        "Stored uploaded content"
    );
    Ok(())
}

/// Send the YouTube result after the simulated processing delay
fn schedule_youtube_result<C: ChatIo>(
    io: C,
    inbound: &Inbound,
    url: String,
    ctx: &Arc<AppContext>,
) {
    let job_ctx = Arc::clone(ctx);
    let chat_id = inbound.chat_id;
    let user_id = inbound.user_id.clone();

    ctx.jobs.schedule(inbound.session, ctx.youtube_delay, async move {
        let niche = job_ctx.profiles.get(&user_id);
        let suggestion = job_ctx
            .suggester
            .suggest(niche, &ContentHint::YoutubeLink(&url));

        let sent = async {
            io.send(chat_id, Reply::text(youtube_result_text(&suggestion))).await?;
            io.send(chat_id, main_menu_reply(niche)).await
        }
        .await;

        match sent {
            Ok(()) => info!(user_id = %user_id, url = %url, "YouTube link processed"),
            Err(e) => error!(user_id = %user_id, error = %e, "Failed to deliver YouTube result"),
        }
    });
}
