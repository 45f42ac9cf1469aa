//! Shared state handed to every handler through the dispatcher.

use std::sync::Arc;
use std::time::Duration;
use teloxide::types::ChatId;

use crate::profile_store::ProfileStore;
use crate::staging::StagingArea;
use crate::suggestions::ContentSuggester;
use crate::youtube::ProcessingJobs;

pub struct AppContext {
    pub profiles: Arc<dyn ProfileStore>,
    pub suggester: ContentSuggester,
    pub staging: StagingArea,
    /// Simulated YouTube processing, one pending job per conversation session
    pub jobs: Arc<ProcessingJobs<ChatId>>,
    pub youtube_delay: Duration,
}

impl AppContext {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        suggester: ContentSuggester,
        staging: StagingArea,
        youtube_delay: Duration,
    ) -> Self {
        Self {
            profiles,
            suggester,
            staging,
            jobs: Arc::new(ProcessingJobs::new()),
            youtube_delay,
        }
    }
}
