use crate::session::token_store::{TokenStore, TokenStoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Tokens issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    /// A pre-issued access token without expiry.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Credentials {
            access_token: access_token.into(),
            id_token: None,
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// The signed-in state, shared by every component that talks to the backends.
///
/// A session is issued by [`Session::sign_in`] and ends with [`Session::sign_out`] or when its
/// tokens expire. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Arc<RwLock<Option<Credentials>>>,
    store: Option<TokenStore>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn with_store(store: TokenStore) -> Self {
        Session {
            credentials: Arc::new(RwLock::new(None)),
            store: Some(store),
        }
    }

    /// Picks up the session a previous run left behind, if it is still valid.
    #[instrument(skip_all)]
    pub async fn restore(store: TokenStore) -> Result<Self, SessionError> {
        let stored = store.load().await?;
        let session = Session::with_store(store);

        match stored {
            Some(credentials) if credentials.is_expired_at(Utc::now()) => {
                info!("🔑 Stored session expired");
                session.sign_out().await?;
            }
            Some(credentials) => {
                info!("🔑 Restored stored session");
                *session.credentials.write().await = Some(credentials);
            }
            None => {}
        }

        Ok(session)
    }

    #[instrument(skip_all)]
    pub async fn sign_in(&self, credentials: Credentials) -> Result<(), SessionError> {
        if let Some(store) = &self.store {
            store.save(&credentials).await?;
        }
        *self.credentials.write().await = Some(credentials);
        info!("🔑 Signed in");
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.credentials.write().await.take();
        if let Some(store) = &self.store {
            store.clear().await?;
        }
        info!("🔑 Signed out");
        Ok(())
    }

    /// The access token to send as `Authorization: Bearer`.
    pub async fn bearer(&self) -> Result<String, SessionError> {
        let credentials = self.credentials.read().await.clone();
        match credentials {
            None => Err(SessionError::NotSignedIn),
            Some(credentials) if credentials.is_expired_at(Utc::now()) => {
                warn!("🔑 Session expired");
                if let Err(e) = self.sign_out().await {
                    warn!("⚠️ Unable to clear the expired session: {}", e);
                }
                Err(SessionError::Expired)
            }
            Some(credentials) => Ok(credentials.access_token),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.bearer().await.ok()
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.token().await.is_some()
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("the session has expired")]
    Expired,
    #[error(transparent)]
    Store(#[from] TokenStoreError),
}
