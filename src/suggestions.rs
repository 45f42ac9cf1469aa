//! # Content Suggestion Module
//!
//! Canned captions and hashtags keyed by niche. Captions are picked at random
//! from a fixed list; the content itself is never inspected.
//!
//! ## Tables
//!
//! - Upload captions and YouTube captions are separate lists
//! - Fitness, tech and business have their own lists; every other niche
//!   (and users without a niche) get the generic lists
//! - Hashtags are one fixed string per niche, shared by both kinds

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::dialogue::MediaKind;
use crate::niche::Niche;

/// Caption and hashtag line proposed for a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub caption: &'static str,
    pub hashtags: &'static str,
}

/// What the suggestion is for; selects the caption table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentHint<'a> {
    Upload(MediaKind),
    YoutubeLink(&'a str),
}

const FITNESS_UPLOAD: &[&str] = &[
    "Transform your body in 30 days! 💪 #FitnessJourney\n\nWho's joining me? 👇",
    "Form is everything! Proper technique prevents injury and maximizes results. 🏋️‍♂️\n\nSave this for your next workout!",
    "The only bad workout is the one that didn't happen. Get after it! 🔥",
];

const TECH_UPLOAD: &[&str] = &[
    "This new tech is going to change everything! 🤯\n\nWhat do you think? 👇",
    "Tech tip of the day: Always keep your software updated for security and performance! 🔒\n\nSave this tip!",
    "The future is here, and it's amazing! This technology will revolutionize how we live. 🚀",
];

const BUSINESS_UPLOAD: &[&str] = &[
    "This business strategy doubled my revenue in 30 days! 📈\n\nWant me to explain how? 👇",
    "Entrepreneur tip: Focus on providing value, not just making sales. The money will follow. 💼\n\nAgree?",
    "The most successful people invest in themselves first. Never stop learning! 📚",
];

const GENERIC_UPLOAD: &[&str] = &[
    "Check out this amazing content! 🌟\n\nWhat do you think? 👇",
    "This is going to change your perspective! 💡\n\nSave for later! 📌",
    "You need to see this! 🔥\n\nShare with someone who needs to see this too!",
];

const FITNESS_YOUTUBE: &[&str] = &[
    "This workout technique from YouTube completely transformed my routine! 💪\n\nWatch and learn! 👇",
    "I found this amazing fitness tutorial on YouTube that I had to share! 🏋️‍♂️\n\nSave this for your next workout!",
    "Game-changing fitness advice from experts on YouTube! 🔥\n\nWho's trying this with me?",
];

const TECH_YOUTUBE: &[&str] = &[
    "This YouTube tech review saved me from buying the wrong product! 📱\n\nVery insightful! 👇",
    "Amazing tech tutorial I found on YouTube that everyone should see! 🤯\n\nSave this for later!",
    "This YouTube channel has the best tech tips I've ever seen! 🚀\n\nCheck it out!",
];

const BUSINESS_YOUTUBE: &[&str] = &[
    "This YouTube business strategy completely changed how I approach marketing! 📈\n\nMust watch! 👇",
    "I found this incredible business advice on YouTube that doubled my revenue! 💼\n\nSave this!",
    "Game-changing entrepreneurial advice from YouTube experts! 🔥\n\nWatch and implement!",
];

const GENERIC_YOUTUBE: &[&str] = &[
    "Amazing content I found on YouTube that you need to see! 🌟\n\nCheck it out! 👇",
    "This YouTube video completely changed my perspective! 💡\n\nVery insightful!",
    "You need to watch this YouTube video! 🔥\n\nShare with others who need to see this too!",
];

const FITNESS_HASHTAGS: &str =
    "#fitness #workout #gym #health #fit #motivation #training #lifestyle #fitfam #gymlife";
const TECH_HASHTAGS: &str =
    "#technology #tech #gadgets #innovation #ai #future #digital #device #techie #techtips";
const BUSINESS_HASHTAGS: &str =
    "#business #entrepreneur #success #motivation #marketing #startup #leadership #money #growth #hustle";
const GENERIC_HASHTAGS: &str =
    "#viral #trending #explorepage #fyp #foryou #instagram #content #follow #like #share";

/// Candidate captions for a niche and content kind
pub fn captions_for(niche: Option<Niche>, hint: &ContentHint<'_>) -> &'static [&'static str] {
    match (hint, niche) {
        (ContentHint::Upload(_), Some(Niche::Fitness)) => FITNESS_UPLOAD,
        (ContentHint::Upload(_), Some(Niche::Tech)) => TECH_UPLOAD,
        (ContentHint::Upload(_), Some(Niche::Business)) => BUSINESS_UPLOAD,
        (ContentHint::Upload(_), _) => GENERIC_UPLOAD,
        (ContentHint::YoutubeLink(_), Some(Niche::Fitness)) => FITNESS_YOUTUBE,
        (ContentHint::YoutubeLink(_), Some(Niche::Tech)) => TECH_YOUTUBE,
        (ContentHint::YoutubeLink(_), Some(Niche::Business)) => BUSINESS_YOUTUBE,
        (ContentHint::YoutubeLink(_), _) => GENERIC_YOUTUBE,
    }
}

/// Hashtag line for a niche
pub fn hashtags_for(niche: Option<Niche>) -> &'static str {
    match niche {
        Some(Niche::Fitness) => FITNESS_HASHTAGS,
        Some(Niche::Tech) => TECH_HASHTAGS,
        Some(Niche::Business) => BUSINESS_HASHTAGS,
        _ => GENERIC_HASHTAGS,
    }
}

/// Pick a caption and the hashtag line for the niche
pub fn suggest<R: Rng + ?Sized>(
    niche: Option<Niche>,
    hint: &ContentHint<'_>,
    rng: &mut R,
) -> Suggestion {
    let captions = captions_for(niche, hint);
    let caption = captions.choose(rng).copied().unwrap_or_default();

    Suggestion {
        caption,
        hashtags: hashtags_for(niche),
    }
}

/// Thread-safe suggestion source owning its random generator
pub struct ContentSuggester<R = StdRng> {
    rng: Mutex<R>,
}

impl ContentSuggester<StdRng> {
    /// Suggester seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Suggester with a fixed seed, for reproducible output
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ContentSuggester<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn suggest(&self, niche: Option<Niche>, hint: &ContentHint<'_>) -> Suggestion {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        suggest(niche, hint, &mut *rng)
    }
}
