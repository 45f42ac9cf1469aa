//! # Profile Store Module
//!
//! Durable mapping from Telegram user id to the user's profile (currently
//! only the chosen niche).
//!
//! The file format is a single JSON object:
//!
//! ```json
//! { "123456": { "niche": "fitness" } }
//! ```
//!
//! Storage failures never stop the bot: a file that cannot be read starts an
//! empty map, and a failed flush leaves the in-memory update in place.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::errors::StoreError;
use crate::niche::{Niche, GENERAL_KEY};

/// Per-user profile record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niche: Option<Niche>,
}

pub type ProfileMap = HashMap<String, UserProfile>;

/// Storage for user profiles
pub trait ProfileStore: Send + Sync {
    /// Chosen niche of a user, if any
    fn get(&self, user_id: &str) -> Option<Niche>;

    /// Record the niche for a user and flush the store
    ///
    /// The in-memory update holds even when the flush fails.
    fn set(&self, user_id: &str, niche: Niche) -> Result<(), StoreError>;

    /// Replace the in-memory map with the persisted one; returns the number
    /// of profiles loaded
    fn load_all(&self) -> Result<usize, StoreError>;

    /// Niche key for display and templating, `general` when unset
    fn niche_key(&self, user_id: &str) -> &'static str {
        self.get(user_id).map(Niche::key).unwrap_or(GENERAL_KEY)
    }
}

fn read_guard(profiles: &RwLock<ProfileMap>) -> RwLockReadGuard<'_, ProfileMap> {
    profiles.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_guard(profiles: &RwLock<ProfileMap>) -> RwLockWriteGuard<'_, ProfileMap> {
    profiles.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn upsert(profiles: &mut ProfileMap, user_id: &str, niche: Niche) {
    profiles.entry(user_id.to_string()).or_default().niche = Some(niche);
}

/// Profile store backed by a JSON file, rewritten in full on every change
#[derive(Debug)]
pub struct JsonFileProfileStore {
    path: PathBuf,
    profiles: RwLock<ProfileMap>,
}

impl JsonFileProfileStore {
    /// Open the store and load existing profiles
    ///
    /// Never fails: an unreadable or malformed file is logged and the store
    /// starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            profiles: RwLock::new(HashMap::new()),
        };

        match store.load_all() {
            Ok(count) => info!(path = %store.path.display(), profiles = count, "Profile store loaded"),
            Err(e) => error!(path = %store.path.display(), error = %e, "Failed to load profiles, starting empty"),
        }

        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<ProfileMap, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No profile file yet");
                return Ok(HashMap::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the whole map through a temporary file renamed over the target
    fn flush(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let json = serde_json::to_string(profiles)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut temp_file = NamedTempFile::new_in(dir).map_err(io_error)?;
        temp_file.write_all(json.as_bytes()).map_err(io_error)?;
        temp_file.as_file().sync_all().map_err(io_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), profiles = profiles.len(), "Profiles flushed");
        Ok(())
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn get(&self, user_id: &str) -> Option<Niche> {
        read_guard(&self.profiles)
            .get(user_id)
            .and_then(|profile| profile.niche)
    }

    fn set(&self, user_id: &str, niche: Niche) -> Result<(), StoreError> {
        // Flushing under the write lock keeps concurrent setters from
        // overwriting each other's updates.
        let mut profiles = write_guard(&self.profiles);
        upsert(&mut profiles, user_id, niche);
        self.flush(&profiles)
    }

    fn load_all(&self) -> Result<usize, StoreError> {
        let mut profiles = write_guard(&self.profiles);
        match self.read_file() {
            Ok(loaded) => {
                *profiles = loaded;
                Ok(profiles.len())
            }
            Err(e) => {
                profiles.clear();
                Err(e)
            }
        }
    }
}

/// Profile store that lives only in memory
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<ProfileMap>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with profiles
    pub fn with_profiles(profiles: ProfileMap) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    pub fn snapshot(&self) -> ProfileMap {
        read_guard(&self.profiles).clone()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, user_id: &str) -> Option<Niche> {
        read_guard(&self.profiles)
            .get(user_id)
            .and_then(|profile| profile.niche)
    }

    fn set(&self, user_id: &str, niche: Niche) -> Result<(), StoreError> {
        upsert(&mut write_guard(&self.profiles), user_id, niche);
        Ok(())
    }

    fn load_all(&self) -> Result<usize, StoreError> {
        Ok(read_guard(&self.profiles).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_defaults_to_general() {
        let store = InMemoryProfileStore::new();
        assert_eq!(store.get("1"), None);
        assert_eq!(store.niche_key("1"), "general");

        store.set("1", Niche::Food).unwrap();
        assert_eq!(store.niche_key("1"), "food");
    }

    #[test]
    fn test_profile_without_niche_serializes_empty() {
        let json = serde_json::to_string(&UserProfile::default()).unwrap();
        assert_eq!(json, "{}");
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.niche, None);
    }
}
