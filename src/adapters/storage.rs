use crate::domain::model::{Credential, StoredToken};
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the access token in a single JSON file: `{"access_token": "..."}`.
#[derive(Debug, Clone)]
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

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Credential>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No token file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("Could not read token file {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_slice::<StoredToken>(&data) {
            Ok(stored) if !stored.access_token.is_empty() => {
                Ok(Some(Credential::new(stored.access_token)))
            }
            Ok(_) => {
                tracing::warn!("Token file {} holds an empty token", self.path.display());
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored = StoredToken {
            access_token: credential.access_token().to_string(),
        };
        fs::write(&self.path, serde_json::to_vec(&stored)?)?;
        tracing::info!("Access token saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("access_token.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("access_token.json");
        let store = FileTokenStore::new(&path);

        store.save(&Credential::new("abc123")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"access_token": "abc123"}));

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token(), "abc123");
    }

    #[tokio::test]
    async fn test_garbled_file_is_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("access_token.json");
        fs::write(&path, b"not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
    }
}
