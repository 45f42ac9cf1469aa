//! Conversation state machine for the menu tree.
//!
//! The machine is a pure function from (current state, incoming event, stored
//! niche) to the next state and a list of [`Effect`]s. Nothing in here talks
//! to Telegram or to storage; `bot::dialogue_manager` executes the effects.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::menu::MenuAction;
use crate::niche::Niche;
use crate::youtube::is_valid_youtube_url;

/// Represents the step of the menu tree a user is in
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    NicheSelection,
    MainMenu,
    UploadContent,
    YoutubeProcessing,
}

/// Type alias for our conversation dialogue
pub type ConversationDialogue = Dialogue<ConversationState, InMemStorage<ConversationState>>;

/// Kind of media accepted in the upload step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    /// Extension used for staged files
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }
}

/// An incoming update, reduced to what the state machine cares about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    Help,
    Cancel,
    Text(String),
    Media(MediaKind),
    /// Stickers, voice notes, locations and anything else
    Unsupported,
}

/// Something the bot has to do as a result of a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    PromptNiche,
    RejectNiche,
    SaveNiche(Niche),
    ConfirmNiche(Niche),
    ShowMainMenu,
    ShowUploadPrompt,
    ShowYoutubePrompt,
    ShowSettings,
    ShowAnalytics,
    ShowAiOptimization,
    OptionUnavailable,
    /// Stage the file, generate a suggestion and reply with it
    AcceptUpload(MediaKind),
    RejectUpload,
    /// Acknowledge the link and schedule the simulated processing
    ProcessYoutubeLink(String),
    RejectYoutubeLink,
    ShowHelp,
    Cancelled,
}

/// Result of feeding one event to the state machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State after the event; `None` means no active session
    pub next: Option<ConversationState>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: ConversationState, effects: Vec<Effect>) -> Self {
        Self {
            next: Some(next),
            effects,
        }
    }

    fn stay(current: Option<&ConversationState>, effects: Vec<Effect>) -> Self {
        Self {
            next: current.cloned(),
            effects,
        }
    }
}

/// Entry logic shared by `/start` and Back from the main menu
fn enter(known_niche: Option<Niche>) -> Transition {
    match known_niche {
        Some(_) => Transition::to(ConversationState::MainMenu, vec![Effect::ShowMainMenu]),
        None => Transition::to(ConversationState::NicheSelection, vec![Effect::PromptNiche]),
    }
}

fn back_to_main_menu() -> Transition {
    Transition::to(ConversationState::MainMenu, vec![Effect::ShowMainMenu])
}

/// Compute the next state and effects for an event
pub fn transition(
    current: Option<&ConversationState>,
    event: &Event,
    known_niche: Option<Niche>,
) -> Transition {
    match event {
        Event::Start => return enter(known_niche),
        Event::Help => return Transition::stay(current, vec![Effect::ShowHelp]),
        Event::Cancel => {
            return Transition {
                next: None,
                effects: vec![Effect::Cancelled],
            }
        }
        Event::Text(_) | Event::Media(_) | Event::Unsupported => {}
    }

    let Some(state) = current else {
        // No session: only commands are answered
        return Transition::stay(None, Vec::new());
    };

    match state {
        ConversationState::NicheSelection => match event {
            Event::Text(text) => match Niche::from_text(text) {
                Some(niche) => Transition::to(
                    ConversationState::MainMenu,
                    vec![
                        Effect::SaveNiche(niche),
                        Effect::ConfirmNiche(niche),
                        Effect::ShowMainMenu,
                    ],
                ),
                None => Transition::stay(current, vec![Effect::RejectNiche]),
            },
            _ => Transition::stay(current, vec![Effect::RejectNiche]),
        },

        ConversationState::MainMenu => {
            let action = match event {
                Event::Text(text) => MenuAction::from_text(text),
                _ => None,
            };
            match action {
                Some(MenuAction::UploadContent) => Transition::to(
                    ConversationState::UploadContent,
                    vec![Effect::ShowUploadPrompt],
                ),
                Some(MenuAction::YoutubeToReel) => Transition::to(
                    ConversationState::YoutubeProcessing,
                    vec![Effect::ShowYoutubePrompt],
                ),
                Some(MenuAction::Settings) => Transition::stay(current, vec![Effect::ShowSettings]),
                Some(MenuAction::Analytics) => {
                    Transition::stay(current, vec![Effect::ShowAnalytics])
                }
                Some(MenuAction::AiOptimization) => {
                    Transition::stay(current, vec![Effect::ShowAiOptimization])
                }
                Some(MenuAction::Back) => enter(known_niche),
                None => Transition::stay(
                    current,
                    vec![Effect::OptionUnavailable, Effect::ShowMainMenu],
                ),
            }
        }

        ConversationState::UploadContent => match event {
            Event::Media(kind) => Transition::to(
                ConversationState::MainMenu,
                vec![Effect::AcceptUpload(*kind), Effect::ShowMainMenu],
            ),
            Event::Text(text) if MenuAction::from_text(text) == Some(MenuAction::Back) => {
                back_to_main_menu()
            }
            _ => Transition::stay(current, vec![Effect::RejectUpload]),
        },

        ConversationState::YoutubeProcessing => match event {
            Event::Text(text) if MenuAction::from_text(text) == Some(MenuAction::Back) => {
                back_to_main_menu()
            }
            Event::Text(text) if is_valid_youtube_url(text) => Transition::to(
                ConversationState::MainMenu,
                vec![Effect::ProcessYoutubeLink(text.trim().to_string())],
            ),
            _ => Transition::stay(current, vec![Effect::RejectYoutubeLink]),
        },
    }
}
