//! File-backed session slot

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{PersistedSession, SessionStore};
use crate::error::StoreError;

/// Session slot file name
const SESSION_FILE: &str = "user_data.json";

/// Stores the session as JSON in `<dir>/user_data.json`
///
/// Writes go to a sibling temporary file, created owner-only on unix and
/// synced to disk, which is then renamed over the slot. A crash mid-write
/// leaves either the old record or the new one.
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    /// Store rooted at `dir` (created lazily on first save)
    pub fn new(dir: &Path) -> Self {
        Self {
            file_path: dir.join(SESSION_FILE),
        }
    }

    /// Store rooted at the XDG data directory
    pub fn in_data_dir() -> Self {
        Self::new(&places_paths::data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        self.file_path.with_extension("json.tmp")
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<PersistedSession>, StoreError> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        match serde_json::from_str::<PersistedSession>(&content) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.file_path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write(format!("failed to create data dir: {}", e)))?;
        }

        let content =
            serde_json::to_string(session).map_err(|e| StoreError::Serialize(e.to_string()))?;

        let temp = self.temp_path();
        let written = match write_synced(&temp, content.as_bytes()).await {
            Ok(()) => fs::rename(&temp, &self.file_path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::Write(e.to_string()));
        }

        debug!("Session written to {}", self.file_path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.file_path).await {
            Ok(()) => {
                debug!("Session file {} removed", self.file_path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write(e.to_string())),
        }
    }
}

/// Write `bytes` to a fresh file at `path` and flush it to disk
///
/// The slot holds a bearer token, so the file is owner read/write only from
/// the moment it exists. A leftover file from an interrupted save is
/// replaced rather than reused, since its mode may be wider.
async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
