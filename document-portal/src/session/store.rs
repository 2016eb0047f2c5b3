//! Persistent slot for the bearer token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> io::Result<Option<Secret<String>>>;
    async fn save(&self, token: &Secret<String>) -> io::Result<()>;
    async fn clear(&self) -> io::Result<()>;
}

/// Token store living only as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<Secret<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(Secret::new(token.into()))),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> io::Result<Option<Secret<String>>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, token: &Secret<String>) -> io::Result<()> {
        *self.slot.lock().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> io::Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token store backed by a small JSON file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> io::Result<Option<Secret<String>>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<StoredToken>(&raw) {
            Ok(stored) if !stored.token.is_empty() => Ok(Some(Secret::new(stored.token))),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
                Ok(None)
            }
        }
    }

    async fn save(&self, token: &Secret<String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let stored = StoredToken {
            token: token.expose_secret().clone(),
            saved_at: Utc::now(),
        };
        let body = serde_json::to_vec(&stored).map_err(io::Error::other)?;
        tokio::fs::write(&self.path, body).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        Ok(())
    }

    async fn clear(&self) -> io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
