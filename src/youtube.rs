//! # YouTube Module
//!
//! Link validation for the "YouTube to Reel" step and the registry of
//! simulated processing jobs. Processing is a delayed reply: no video is
//! downloaded or inspected.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

// Host, optional path prefix, then an 11 character video id
const YOUTUBE_PATTERN: &str = r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})";

lazy_static! {
    static ref YOUTUBE_REGEX: Regex =
        Regex::new(YOUTUBE_PATTERN).expect("YouTube link pattern should be valid");
}

/// Check whether the text has the shape of a YouTube video link
///
/// Only the structure is checked; the video is never fetched.
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_REGEX.is_match(url.trim())
}

/// Pending delayed jobs, at most one per key
///
/// Scheduling a job for a key that already has one aborts the older job.
/// Jobs remove themselves from the registry once they finish.
pub struct ProcessingJobs<K> {
    jobs: Mutex<HashMap<K, (u64, AbortHandle)>>,
    next_id: AtomicU64,
}

impl<K> Default for ProcessingJobs<K> {
    fn default() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<K> ProcessingJobs<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` after `delay` on the tokio runtime
    ///
    /// The delay is a timer, not a blocking sleep, so other updates keep
    /// being served while the job waits.
    pub fn schedule<F>(self: &Arc<Self>, key: K, delay: Duration, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(self);
        let task_key = key.clone();

        // Hold the lock across spawn so the task cannot finish and try to
        // deregister before it is registered.
        let mut jobs = self.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
            registry.finish(&task_key, id);
        });

        if let Some((_, previous)) = jobs.insert(key.clone(), (id, handle.abort_handle())) {
            debug!(key = ?key, "Replacing pending processing job");
            previous.abort();
        }
    }

    /// Abort the pending job for `key`; returns whether one was pending
    pub fn cancel(&self, key: &K) -> bool {
        match self.lock().remove(key) {
            Some((_, handle)) => {
                handle.abort();
                debug!(key = ?key, "Cancelled pending processing job");
                true
            }
            None => false,
        }
    }

    /// Whether a job is waiting or running for `key`
    pub fn is_pending(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    fn finish(&self, key: &K, id: u64) {
        let mut jobs = self.lock();
        if jobs.get(key).is_some_and(|(current, _)| *current == id) {
            jobs.remove(key);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, (u64, AbortHandle)>> {
        // The map stays consistent even if a holder panicked
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
