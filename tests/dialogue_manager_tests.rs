use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::types::{ChatId, FileId, UserId};

use social_autopilot::bot::message_handler::session_key;
use social_autopilot::bot::ui_builder::Reply;
use social_autopilot::bot::{handle_event, AppContext, ChatIo, Inbound};
use social_autopilot::dialogue::{ConversationDialogue, ConversationState, Event, MediaKind};
use social_autopilot::errors::StoreError;
use social_autopilot::localization::{t, t_args};
use social_autopilot::menu::MenuAction;
use social_autopilot::niche::Niche;
use social_autopilot::profile_store::{InMemoryProfileStore, ProfileStore, UserProfile};
use social_autopilot::staging::StagingArea;
use social_autopilot::suggestions::ContentSuggester;

const VIDEO_LINK: &str = "https://youtu.be/dQw4w9WgXcQ";

/// Chat double that records replies and serves one canned download
#[derive(Clone, Default)]
struct RecordingChat {
    sent: Arc<Mutex<Vec<(ChatId, String)>>>,
    fail_sends: bool,
    file_bytes: Option<Vec<u8>>,
}

impl RecordingChat {
    fn with_file(bytes: &[u8]) -> Self {
        Self {
            file_bytes: Some(bytes.to_vec()),
            ..Self::default()
        }
    }

    fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl ChatIo for RecordingChat {
    fn send(&self, chat_id: ChatId, reply: Reply) -> impl Future<Output = Result<()>> + Send {
        let sent = Arc::clone(&self.sent);
        let fail = self.fail_sends;
        async move {
            if fail {
                return Err(anyhow!("Telegram is unreachable"));
            }
            sent.lock().unwrap().push((chat_id, reply.text));
            Ok(())
        }
    }

    fn download(&self, _file_id: FileId) -> impl Future<Output = Result<Vec<u8>>> + Send {
        let bytes = self.file_bytes.clone();
        async move { bytes.ok_or_else(|| anyhow!("file is gone")) }
    }
}

/// Store whose writes always fail
struct ReadOnlyStore;

impl ProfileStore for ReadOnlyStore {
    fn get(&self, _user_id: &str) -> Option<Niche> {
        None
    }

    fn set(&self, _user_id: &str, _niche: Niche) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("user_data.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn load_all(&self) -> Result<usize, StoreError> {
        Ok(0)
    }
}

fn context(
    profiles: Arc<dyn ProfileStore>,
    staging: StagingArea,
    delay: Duration,
) -> Arc<AppContext> {
    Arc::new(AppContext::new(
        profiles,
        ContentSuggester::seeded(7),
        staging,
        delay,
    ))
}

fn inbound(user: u64, chat: i64) -> Inbound {
    Inbound {
        chat_id: ChatId(chat),
        user_id: user.to_string(),
        session: session_key(Some(UserId(user)), ChatId(chat)),
        file: None,
    }
}

fn dialogue_for(
    storage: &Arc<InMemStorage<ConversationState>>,
    inbound: &Inbound,
) -> ConversationDialogue {
    Dialogue::new(Arc::clone(storage), inbound.session)
}

fn text(value: &str) -> Event {
    Event::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fresh user picks Fitness: the profile is stored and the main menu follows
    #[tokio::test]
    async fn test_fresh_user_selects_fitness() {
        let store = Arc::new(InMemoryProfileStore::new());
        let ctx = context(store.clone(), StagingArea::new("unused"), Duration::from_secs(60));
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::default();
        let from = inbound(42, 42);
        let dialogue = dialogue_for(&storage, &from);

        handle_event(&chat, &from, dialogue.clone(), &ctx, Event::Start)
            .await
            .unwrap();
        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::NicheSelection));
        assert_eq!(chat.texts(), vec![t("welcome-niche-prompt")]);

        handle_event(&chat, &from, dialogue.clone(), &ctx, text(Niche::Fitness.label()))
            .await
            .unwrap();

        assert_eq!(store.get("42"), Some(Niche::Fitness));
        assert_eq!(store.niche_key("42"), "fitness");
        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));
        let texts = chat.texts();
        assert_eq!(texts.len(), 3);
        assert_eq!(
            texts[1],
            t_args("niche-confirmed", &[("niche", Niche::Fitness.label())])
        );
    }

    /// A failed profile write still confirms the niche and opens the main menu
    #[tokio::test]
    async fn test_niche_save_failure_continues() {
        let ctx = context(
            Arc::new(ReadOnlyStore),
            StagingArea::new("unused"),
            Duration::from_secs(60),
        );
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::default();
        let from = inbound(5, 5);
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::NicheSelection).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, text(Niche::Travel.label()))
            .await
            .unwrap();

        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));
        let texts = chat.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(
            texts[0],
            t_args("niche-confirmed", &[("niche", Niche::Travel.label())])
        );
    }

    /// Undeliverable replies do not leave the session behind the stored profile
    #[tokio::test]
    async fn test_send_failures_still_commit_state() {
        let store = Arc::new(InMemoryProfileStore::new());
        let ctx = context(store.clone(), StagingArea::new("unused"), Duration::from_secs(60));
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::failing_sends();
        let from = inbound(8, 8);
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::NicheSelection).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, text(Niche::Gaming.label()))
            .await
            .unwrap();

        assert_eq!(store.get("8"), Some(Niche::Gaming));
        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));
    }

    /// An upload that cannot be written keeps the user in the upload step
    #[tokio::test]
    async fn test_staging_failure_keeps_upload_step() {
        // A regular file where the staging directory's parent should be
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let staging = StagingArea::new(blocker.path().join("downloads"));
        let ctx = context(Arc::new(InMemoryProfileStore::new()), staging, Duration::from_secs(60));
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::with_file(b"jpeg");
        let mut from = inbound(3, 3);
        from.file = Some(FileId("photo-1".to_string()));
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::UploadContent).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, Event::Media(MediaKind::Photo))
            .await
            .unwrap();

        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::UploadContent));
        assert_eq!(chat.texts(), vec![t("upload-failed")]);
    }

    /// A download failure is reported the same way as a write failure
    #[tokio::test]
    async fn test_download_failure_keeps_upload_step() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(
            Arc::new(InMemoryProfileStore::new()),
            StagingArea::new(root.path()),
            Duration::from_secs(60),
        );
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::default();
        let mut from = inbound(3, 3);
        from.file = Some(FileId("video-1".to_string()));
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::UploadContent).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, Event::Media(MediaKind::Video))
            .await
            .unwrap();

        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::UploadContent));
        assert_eq!(chat.texts(), vec![t("upload-failed")]);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    /// A staged upload gets suggestions and returns to the main menu
    #[tokio::test]
    async fn test_upload_is_staged() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(
            Arc::new(InMemoryProfileStore::new()),
            StagingArea::new(root.path().join("downloads")),
            Duration::from_secs(60),
        );
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::with_file(b"mp4");
        let mut from = inbound(9, 9);
        from.file = Some(FileId("video-2".to_string()));
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::UploadContent).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, Event::Media(MediaKind::Video))
            .await
            .unwrap();

        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));
        assert_eq!(chat.texts().len(), 2);
        let staged: Vec<PathBuf> = std::fs::read_dir(root.path().join("downloads"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(staged.len(), 1);
        assert!(staged[0].to_string_lossy().ends_with(".video"));
        assert_eq!(std::fs::read(&staged[0]).unwrap(), b"mp4");
    }

    /// /cancel aborts a pending YouTube result and ends the session
    #[tokio::test]
    async fn test_cancel_aborts_pending_youtube_job() {
        let ctx = context(
            Arc::new(InMemoryProfileStore::new()),
            StagingArea::new("unused"),
            Duration::from_secs(60),
        );
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::default();
        let from = inbound(11, 11);
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::YoutubeProcessing).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, text(VIDEO_LINK))
            .await
            .unwrap();
        assert_eq!(dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));
        assert!(ctx.jobs.is_pending(&from.session));
        assert_eq!(chat.texts(), vec![t("youtube-analyzing")]);

        handle_event(&chat, &from, dialogue.clone(), &ctx, Event::Cancel)
            .await
            .unwrap();

        assert!(!ctx.jobs.is_pending(&from.session));
        assert_eq!(dialogue.get().await.unwrap(), None);
        assert_eq!(chat.texts().last(), Some(&t("cancelled")));
    }

    /// The YouTube result and the main menu arrive once the delay has passed
    #[tokio::test]
    async fn test_youtube_result_is_delivered() {
        let ctx = context(
            Arc::new(InMemoryProfileStore::new()),
            StagingArea::new("unused"),
            Duration::from_millis(10),
        );
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::default();
        let from = inbound(12, 12);
        let dialogue = dialogue_for(&storage, &from);
        dialogue.update(ConversationState::YoutubeProcessing).await.unwrap();

        handle_event(&chat, &from, dialogue.clone(), &ctx, text(VIDEO_LINK))
            .await
            .unwrap();

        for _ in 0..200 {
            if !ctx.jobs.is_pending(&from.session) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!ctx.jobs.is_pending(&from.session));
        assert_eq!(chat.texts().len(), 3);
    }

    /// Two members of one group chat keep separate sessions and jobs
    #[tokio::test]
    async fn test_group_members_have_separate_sessions() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "1".to_string(),
            UserProfile {
                niche: Some(Niche::Tech),
            },
        );
        let ctx = context(
            Arc::new(InMemoryProfileStore::with_profiles(profiles)),
            StagingArea::new("unused"),
            Duration::from_secs(60),
        );
        let storage = InMemStorage::<ConversationState>::new();
        let chat = RecordingChat::default();
        let alice = inbound(1, -100);
        let bob = inbound(2, -100);
        let alice_dialogue = dialogue_for(&storage, &alice);
        let bob_dialogue = dialogue_for(&storage, &bob);

        handle_event(&chat, &alice, alice_dialogue.clone(), &ctx, Event::Start)
            .await
            .unwrap();
        assert_eq!(alice_dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));

        // Bob has no session, so his Back press is ignored
        handle_event(&chat, &bob, bob_dialogue.clone(), &ctx, text(MenuAction::Back.label()))
            .await
            .unwrap();
        assert_eq!(bob_dialogue.get().await.unwrap(), None);
        assert_eq!(alice_dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));

        handle_event(&chat, &bob, bob_dialogue.clone(), &ctx, Event::Start)
            .await
            .unwrap();
        assert_eq!(bob_dialogue.get().await.unwrap(), Some(ConversationState::NicheSelection));
        assert_eq!(alice_dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));

        // Alice queues a link; Bob cancelling his own session leaves it alone
        alice_dialogue
            .update(ConversationState::YoutubeProcessing)
            .await
            .unwrap();
        handle_event(&chat, &alice, alice_dialogue.clone(), &ctx, text(VIDEO_LINK))
            .await
            .unwrap();
        handle_event(&chat, &bob, bob_dialogue.clone(), &ctx, Event::Cancel)
            .await
            .unwrap();

        assert!(ctx.jobs.is_pending(&alice.session));
        assert_eq!(bob_dialogue.get().await.unwrap(), None);
        assert_eq!(alice_dialogue.get().await.unwrap(), Some(ConversationState::MainMenu));
        assert!(chat.sent.lock().unwrap().iter().all(|(chat_id, _)| *chat_id == ChatId(-100)));
    }
}
