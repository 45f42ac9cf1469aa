//! Content niches a user can pick during onboarding.

use serde::{Deserialize, Serialize};

/// Key reported for users without a chosen niche
pub const GENERAL_KEY: &str = "general";

/// Label shown for users without a chosen niche
pub const GENERAL_LABEL: &str = "General";

/// A fixed content category used to pick caption and hashtag templates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    Fitness,
    Tech,
    Business,
    Travel,
    Food,
    Fashion,
    Motivation,
    Education,
    Entertainment,
    Gaming,
}

impl Niche {
    /// All niches, in keyboard order
    pub const ALL: [Niche; 10] = [
        Niche::Fitness,
        Niche::Tech,
        Niche::Business,
        Niche::Travel,
        Niche::Food,
        Niche::Fashion,
        Niche::Motivation,
        Niche::Education,
        Niche::Entertainment,
        Niche::Gaming,
    ];

    /// Stable key, identical to the persisted representation
    pub fn key(self) -> &'static str {
        match self {
            Niche::Fitness => "fitness",
            Niche::Tech => "tech",
            Niche::Business => "business",
            Niche::Travel => "travel",
            Niche::Food => "food",
            Niche::Fashion => "fashion",
            Niche::Motivation => "motivation",
            Niche::Education => "education",
            Niche::Entertainment => "entertainment",
            Niche::Gaming => "gaming",
        }
    }

    /// Button label shown on the niche keyboard
    pub fn label(self) -> &'static str {
        match self {
            Niche::Fitness => "💪 Fitness & Health",
            Niche::Tech => "📱 Technology & Gadgets",
            Niche::Business => "💼 Business & Entrepreneurship",
            Niche::Travel => "✈️ Travel & Adventure",
            Niche::Food => "🍔 Food & Cooking",
            Niche::Fashion => "👗 Fashion & Beauty",
            Niche::Motivation => "🔥 Motivation & Self-Improvement",
            Niche::Education => "🎓 Education & Learning",
            Niche::Entertainment => "🎬 Entertainment & Movies",
            Niche::Gaming => "🎮 Gaming & Esports",
        }
    }

    /// Look up a niche by its stable key
    pub fn from_key(key: &str) -> Option<Niche> {
        Self::ALL.into_iter().find(|niche| niche.key() == key)
    }

    /// Parse user input: the exact button label, or the bare key in any case
    pub fn from_text(text: &str) -> Option<Niche> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|niche| niche.label() == text || niche.key().eq_ignore_ascii_case(text))
    }
}

/// Label for an optional niche, falling back to [`GENERAL_LABEL`]
pub fn display_label(niche: Option<Niche>) -> &'static str {
    niche.map(Niche::label).unwrap_or(GENERAL_LABEL)
}
