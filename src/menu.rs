//! Reply-keyboard buttons and how incoming text maps back onto them.

/// Buttons the conversation reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    UploadContent,
    YoutubeToReel,
    Settings,
    Analytics,
    AiOptimization,
    Back,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::UploadContent,
        MenuAction::YoutubeToReel,
        MenuAction::Settings,
        MenuAction::Analytics,
        MenuAction::AiOptimization,
        MenuAction::Back,
    ];

    /// Full button label, emoji included
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::UploadContent => "📤 Upload Content",
            MenuAction::YoutubeToReel => "🎥 YouTube to Reel",
            MenuAction::Settings => "⚙️ Settings",
            MenuAction::Analytics => "📊 Analytics",
            MenuAction::AiOptimization => "🔍 AI Optimization",
            MenuAction::Back => "◀️ Back",
        }
    }

    /// Label without the emoji
    pub fn title(self) -> &'static str {
        match self {
            MenuAction::UploadContent => "Upload Content",
            MenuAction::YoutubeToReel => "YouTube to Reel",
            MenuAction::Settings => "Settings",
            MenuAction::Analytics => "Analytics",
            MenuAction::AiOptimization => "AI Optimization",
            MenuAction::Back => "Back",
        }
    }

    /// Match a pressed button (or the same words typed by hand)
    pub fn from_text(text: &str) -> Option<MenuAction> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.label() == text || action.title().eq_ignore_ascii_case(text))
    }
}

/// Settings panel buttons (display only)
pub const SETTINGS_OPTIONS: [[&str; 2]; 2] = [
    ["Change Niche", "Posting Schedule"],
    ["Content Preferences", "AI Settings"],
];

/// AI optimization panel buttons (display only)
pub const AI_OPTIMIZATION_OPTIONS: [[&str; 2]; 2] = [
    ["Analyze Performance", "Content Strategy"],
    ["Hashtag Analysis", "Audience Insights"],
];
