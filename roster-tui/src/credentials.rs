//! Session cookie persisted as a JSON file.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use roster_lib::auth::AccessToken;
use roster_lib::auth::TokenStore;
use roster_lib::error::StoreError;

/// Cookie jar file holding tokens by cookie name.
///
/// ```json
/// { "access_token": { "access_token": "eyJ...", "expires_at": "2025-01-08T10:00:00Z" } }
/// ```
///
/// Expired entries are deleted when loaded.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    name: String,
}

type Jar = BTreeMap<String, AccessToken>;

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, cookie_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: cookie_name.into(),
        }
    }

    async fn read_jar(&self) -> Result<Jar, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Jar::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_jar(&self, jar: &Jar) -> Result<(), StoreError> {
        if jar.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(jar)?).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<AccessToken>, StoreError> {
        let mut jar = self.read_jar().await?;
        match jar.get(&self.name) {
            Some(token) if token.is_expired() => {
                debug!("Stored {} cookie expired", self.name);
                jar.remove(&self.name);
                self.write_jar(&jar).await?;
                Ok(None)
            }
            other => Ok(other.cloned()),
        }
    }

    async fn save(&self, token: &AccessToken) -> Result<(), StoreError> {
        let mut jar = self.read_jar().await?;
        jar.insert(self.name.clone(), token.clone());
        self.write_jar(&jar).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut jar = self.read_jar().await?;
        if jar.remove(&self.name).is_some() {
            self.write_jar(&jar).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;
    use roster_lib::auth::CookieOptions;

    use super::*;

    fn temp_store(tag: &str) -> FileTokenStore {
        let path = std::env::temp_dir()
            .join(format!("roster-{}-{}", tag, std::process::id()))
            .join("cookies.json");
        FileTokenStore::new(path, "access_token")
    }

    #[tokio::test]
    async fn test_round_trip_and_clear() {
        let store = temp_store("jar");
        assert_eq!(store.load().await.unwrap(), None);

        let token = CookieOptions::default().stamp("abc");
        store.save(&token).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(token));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!store.path.exists());
    }

    #[tokio::test]
    async fn test_expired_cookie_is_dropped() {
        let store = temp_store("expired");
        let stale = AccessToken::with_expiry("old", Utc::now() - Duration::minutes(1));
        store.save(&stale).await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
        assert!(!store.path.exists());
    }

    #[tokio::test]
    async fn test_other_cookies_are_kept() {
        let store = temp_store("shared");
        let other = FileTokenStore::new(store.path.clone(), "refresh");
        other.save(&AccessToken::new("keep")).await.unwrap();
        store.save(&AccessToken::new("mine")).await.unwrap();

        store.clear().await.unwrap();
        assert_eq!(other.load().await.unwrap(), Some(AccessToken::new("keep")));
        other.clear().await.unwrap();
    }
}
