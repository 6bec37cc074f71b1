//! File based cart snapshot repository.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bazaar_application::ports::{CartRepository, CartStoreError};
use bazaar_domain::Cart;
use tracing::warn;

const CART_FILE: &str = "cart.json";

/// Cart repository keeping a `cart.json` snapshot in the data directory.
pub struct FileCartRepository {
    path: PathBuf,
}

impl FileCartRepository {
    /// Creates a repository rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CART_FILE),
        }
    }
}

#[async_trait]
impl CartRepository for FileCartRepository {
    /// Loads the snapshot. A missing file is an empty cart; an unreadable
    /// one is discarded with a warning rather than blocking the session.
    async fn load(&self) -> Result<Cart, CartStoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Cart::new()),
            Err(e) => return Err(CartStoreError::Io(e)),
        };
        match serde_json::from_slice(&content) {
            Ok(cart) => Ok(cart),
            Err(error) => {
                warn!(%error, path = %self.path.display(), "discarding unreadable cart snapshot");
                Ok(Cart::new())
            }
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(cart)
            .map_err(|e| CartStoreError::Serialization(e.to_string()))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
