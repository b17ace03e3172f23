use crate::session::Credentials;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

/// Keeps the issued tokens in a local JSON file between runs.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Option<Credentials>, TokenStoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("🔑 No stored session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, credentials: &Credentials) -> Result<(), TokenStoreError> {
        let content = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, content).await?;
        debug!("🔑 Stored session");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("unable to access the session file: {0}")]
    Io(#[from] io::Error),
    #[error("the session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
