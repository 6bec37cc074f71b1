//! File based credential store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bazaar_application::ports::{CredentialError, CredentialStore};
use bazaar_domain::TokenPair;
use serde::{Deserialize, Serialize};

const TOKENS_FILE: &str = "tokens.json";

/// Persisted token document. Either slot may be absent, e.g. after an
/// access-only refresh on a store that never held a refresh token.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Credential store keeping a `tokens.json` document in the data
/// directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(TOKENS_FILE),
        }
    }

    /// Reads the token document; a missing file is an empty document.
    async fn read(&self) -> Result<StoredTokens, CredentialError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredTokens::default()),
            Err(e) => return Err(CredentialError::Io(e)),
        };
        serde_json::from_slice(&content)
            .map_err(|e| CredentialError::Serialization(e.to_string()))
    }

    async fn write(&self, tokens: &StoredTokens) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(tokens)
            .map_err(|e| CredentialError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn update(
        &self,
        f: impl FnOnce(&mut StoredTokens) + Send,
    ) -> Result<(), CredentialError> {
        let mut tokens = self.read().await?;
        f(&mut tokens);
        self.write(&tokens).await
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.read().await?.access)
    }

    async fn refresh_token(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.read().await?.refresh)
    }

    async fn store_pair(&self, pair: &TokenPair) -> Result<(), CredentialError> {
        self.write(&StoredTokens {
            access: Some(pair.access.clone()),
            refresh: Some(pair.refresh.clone()),
        })
        .await
    }

    async fn store_access(&self, access: &str) -> Result<(), CredentialError> {
        self.update(|t| t.access = Some(access.to_owned())).await
    }

    async fn store_refresh(&self, refresh: &str) -> Result<(), CredentialError> {
        self.update(|t| t.refresh = Some(refresh.to_owned())).await
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Io(e)),
        }
    }
}
