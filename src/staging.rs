//! Local staging directory for uploaded media.
//!
//! Files are written as `{user_id}_{unix_timestamp}.{kind}` and are never
//! cleaned up; nothing downstream consumes them yet.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::debug;

use crate::dialogue::MediaKind;

/// File name for a staged upload
pub fn staged_file_name(user_id: &str, timestamp: i64, kind: MediaKind) -> String {
    format!("{}_{}.{}", user_id, timestamp, kind.as_str())
}

/// Directory holding raw uploads
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the next upload of `kind` from `user_id` would be written to
    pub fn path_for(&self, user_id: &str, kind: MediaKind) -> PathBuf {
        let timestamp = chrono::Utc::now().timestamp();
        self.dir.join(staged_file_name(user_id, timestamp, kind))
    }

    /// Write raw bytes for an upload, creating the directory on demand
    pub async fn write(&self, user_id: &str, kind: MediaKind, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create staging directory {}", self.dir.display()))?;

        let path = self.path_for(user_id, kind);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write staged file {}", path.display()))?;

        debug!(user_id = %user_id, path = %path.display(), bytes = bytes.len(), "Upload staged");
        Ok(path)
    }
}

/// Fetch the raw bytes of a Telegram file
pub async fn download_file(bot: &Bot, file_id: FileId) -> Result<Vec<u8>> {
    let file = bot
        .get_file(file_id)
        .await
        .context("Failed to resolve Telegram file")?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url)
        .await
        .context("Failed to download Telegram file")?
        .error_for_status()
        .context("Telegram refused the file download")?;
    let bytes = response.bytes().await?;

    Ok(bytes.to_vec())
}
