//! Session context

use std::sync::Arc;

use log::debug;
use log::warn;
use tokio::sync::RwLock;

use super::AccessToken;
use super::TokenStore;
use crate::error::AuthError;
use crate::error::StoreError;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeReason {
    /// The service answered 401.
    Unauthorized,
    /// The user signed out.
    Logout,
}

/// Lifecycle of the session token.
///
/// `Absent -> Issued -> Attached -> Revoked`. A new login moves any state
/// back to `Issued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token is known.
    Absent,
    /// A token was issued or restored but not yet sent.
    Issued,
    /// The token has been attached to at least one request.
    Attached,
    /// The token was discarded.
    Revoked(RevokeReason),
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    token: Option<AccessToken>,
}

/// Holds the session token and mirrors it into a [`TokenStore`].
///
/// Shared by the HTTP client (which attaches the token and revokes it on
/// 401) and the application (which issues it on login and revokes it on
/// logout).
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    inner: RwLock<SessionInner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Creates an empty session backed by `store`.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            inner: RwLock::new(SessionInner {
                state: SessionState::Absent,
                token: None,
            }),
        }
    }

    /// Loads a previously stored token. Returns `true` if one was found.
    pub async fn restore(&self) -> Result<bool, StoreError> {
        let token = self.store.load().await?;
        let mut inner = self.inner.write().await;
        match token {
            Some(token) => {
                debug!("Restored stored session token");
                inner.token = Some(token);
                inner.state = SessionState::Issued;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Installs a freshly issued token and persists it.
    pub async fn issue(&self, token: AccessToken) -> Result<(), StoreError> {
        self.store.save(&token).await?;
        let mut inner = self.inner.write().await;
        inner.token = Some(token);
        inner.state = SessionState::Issued;
        Ok(())
    }

    /// Returns the `Authorization` header value for the next request.
    pub async fn bearer(&self) -> Result<String, AuthError> {
        let mut inner = self.inner.write().await;
        let Some(token) = inner.token.clone() else {
            return Err(AuthError::unauthorized("No session token"));
        };
        if token.is_expired() {
            drop(inner);
            self.revoke(RevokeReason::Unauthorized).await;
            return Err(AuthError::TokenExpired);
        }
        inner.state = SessionState::Attached;
        Ok(token.as_bearer())
    }

    /// Discards the token in memory and in the store.
    ///
    /// A store failure is logged; the in-memory token is dropped regardless.
    pub async fn revoke(&self, reason: RevokeReason) {
        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear stored token: {}", e);
        }
        let mut inner = self.inner.write().await;
        inner.token = None;
        inner.state = SessionState::Revoked(reason);
        debug!("Session revoked: {:?}", reason);
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    /// Returns `true` while a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::auth::MemoryTokenStore;

    fn session() -> (Arc<MemoryTokenStore>, SessionContext) {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionContext::new(store.clone());
        (store, session)
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let (store, session) = session();
        assert_eq!(session.state().await, SessionState::Absent);
        assert!(session.bearer().await.is_err());

        session.issue(AccessToken::new("abc")).await.unwrap();
        assert_eq!(session.state().await, SessionState::Issued);
        assert!(store.load().await.unwrap().is_some());

        assert_eq!(session.bearer().await.unwrap(), "Bearer abc");
        assert_eq!(session.state().await, SessionState::Attached);

        session.revoke(RevokeReason::Logout).await;
        assert_eq!(
            session.state().await,
            SessionState::Revoked(RevokeReason::Logout)
        );
        assert!(store.load().await.unwrap().is_none());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_restore_from_store() {
        let (store, session) = session();
        store.save(&AccessToken::new("saved")).await.unwrap();
        assert!(session.restore().await.unwrap());
        assert_eq!(session.bearer().await.unwrap(), "Bearer saved");
    }

    #[tokio::test]
    async fn test_expired_token_is_revoked() {
        let (_store, session) = session();
        let token = AccessToken::with_expiry("abc", Utc::now() - Duration::seconds(5));
        session.issue(token).await.unwrap();

        let err = session.bearer().await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
        assert_eq!(
            session.state().await,
            SessionState::Revoked(RevokeReason::Unauthorized)
        );
    }
}
