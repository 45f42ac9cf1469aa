//! UI Builder module for creating keyboards and formatting replies

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use crate::dialogue::Effect;
use crate::localization::{t, t_args};
use crate::menu::{MenuAction, AI_OPTIMIZATION_OPTIONS, SETTINGS_OPTIONS};
use crate::niche::{display_label, Niche};
use crate::suggestions::Suggestion;

/// Text plus optional keyboard change, ready to send
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub markup: Option<ReplyMarkup>,
}

impl Reply {
    pub fn text(text: String) -> Self {
        Self { text, markup: None }
    }

    pub fn with_keyboard(text: String, keyboard: KeyboardMarkup) -> Self {
        Self {
            text,
            markup: Some(ReplyMarkup::Keyboard(keyboard)),
        }
    }

    pub fn removing_keyboard(text: String) -> Self {
        Self {
            text,
            markup: Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        }
    }
}

fn row<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<KeyboardButton> {
    labels.into_iter().map(KeyboardButton::new).collect()
}

/// Niche keyboard, two labels per row
pub fn niche_keyboard() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = Niche::ALL
        .chunks(2)
        .map(|pair| row(pair.iter().map(|niche| niche.label())))
        .collect();

    KeyboardMarkup::new(rows)
        .one_time_keyboard()
        .resize_keyboard()
}

/// Main menu keyboard
pub fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        row([
            MenuAction::UploadContent.label(),
            MenuAction::YoutubeToReel.label(),
        ]),
        row([MenuAction::Settings.label(), MenuAction::Analytics.label()]),
        row([MenuAction::AiOptimization.label()]),
    ])
    .resize_keyboard()
}

/// Single Back button
pub fn back_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![row([MenuAction::Back.label()])]).resize_keyboard()
}

fn options_keyboard(options: &[[&'static str; 2]; 2]) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = options.iter().map(|pair| row(*pair)).collect();
    rows.push(row([MenuAction::Back.label()]));
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn settings_keyboard() -> KeyboardMarkup {
    options_keyboard(&SETTINGS_OPTIONS)
}

pub fn ai_optimization_keyboard() -> KeyboardMarkup {
    options_keyboard(&AI_OPTIMIZATION_OPTIONS)
}

pub fn main_menu_reply(niche: Option<Niche>) -> Reply {
    Reply::with_keyboard(
        t_args("main-menu", &[("niche", display_label(niche))]),
        main_menu_keyboard(),
    )
}

pub fn upload_result_text(suggestion: &Suggestion) -> String {
    t_args(
        "upload-result",
        &[
            ("caption", suggestion.caption),
            ("hashtags", suggestion.hashtags),
        ],
    )
}

pub fn youtube_result_text(suggestion: &Suggestion) -> String {
    t_args(
        "youtube-result",
        &[
            ("caption", suggestion.caption),
            ("hashtags", suggestion.hashtags),
        ],
    )
}

/// Reply for an effect that only shows something
///
/// `niche` is the user's stored niche at the time the effect runs. Effects
/// with side effects beyond a reply return `None`.
pub fn render(effect: &Effect, niche: Option<Niche>) -> Option<Reply> {
    let reply = match effect {
        Effect::PromptNiche => Reply::with_keyboard(t("welcome-niche-prompt"), niche_keyboard()),
        Effect::RejectNiche => Reply::text(t("niche-invalid")),
        Effect::ConfirmNiche(selected) => {
            Reply::removing_keyboard(t_args("niche-confirmed", &[("niche", selected.label())]))
        }
        Effect::ShowMainMenu => main_menu_reply(niche),
        Effect::ShowUploadPrompt => Reply::with_keyboard(t("upload-prompt"), back_keyboard()),
        Effect::ShowYoutubePrompt => Reply::with_keyboard(t("youtube-prompt"), back_keyboard()),
        Effect::ShowSettings => Reply::with_keyboard(
            t_args("settings-panel", &[("niche", display_label(niche))]),
            settings_keyboard(),
        ),
        Effect::ShowAnalytics => Reply::with_keyboard(
            t_args("analytics-panel", &[("niche", display_label(niche))]),
            back_keyboard(),
        ),
        Effect::ShowAiOptimization => {
            Reply::with_keyboard(t("ai-optimization-panel"), ai_optimization_keyboard())
        }
        Effect::OptionUnavailable => Reply::text(t("option-unavailable")),
        Effect::RejectUpload => Reply::text(t("upload-unsupported")),
        Effect::RejectYoutubeLink => Reply::text(t("youtube-invalid")),
        Effect::ShowHelp => Reply::text(t("help-text")),
        Effect::Cancelled => Reply::removing_keyboard(t("cancelled")),
        Effect::SaveNiche(_) | Effect::AcceptUpload(_) | Effect::ProcessYoutubeLink(_) => {
            return None
        }
    };

    Some(reply)
}
