use crate::{error::StateStoreError, state::CursorStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Keeps cursors in an embedded sled database, one key per source.
pub struct SledCursorStore {
    db: sled::Db,
    path: PathBuf,
    key: String,
}

impl SledCursorStore {
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, StateStoreError> {
        let db = sled::open(path.as_ref())?;
        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
            key: key.into(),
        })
    }

    /// Helper to generate consistent keys for cursors
    #[inline]
    fn cursor_key(&self) -> String {
        format!("cursor:{}", self.key)
    }
}

#[async_trait]
impl CursorStore for SledCursorStore {
    async fn load(&self) -> Result<Option<String>, StateStoreError> {
        match self.db.get(self.cursor_key())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| StateStoreError::InvalidUtf8),
            None => Ok(None),
        }
    }

    async fn save(&self, value: &str) -> Result<(), StateStoreError> {
        self.db.insert(self.cursor_key(), value.as_bytes())?;
        self.db.flush_async().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<bool, StateStoreError> {
        let removed = self.db.remove(self.cursor_key())?.is_some();
        self.db.flush_async().await?;
        if removed {
            info!(location = %self.location(), "Deleted cursor");
        }
        Ok(removed)
    }

    fn location(&self) -> String {
        format!("{}#{}", self.path.display(), self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn round_trips_cursor_per_key() {
        let dir = tempdir().unwrap();
        let orders = SledCursorStore::open(dir.path(), "orders-Id").unwrap();

        assert_eq!(orders.load().await.unwrap(), None);
        orders.save("17").await.unwrap();
        orders.save("18").await.unwrap();
        assert_eq!(orders.load().await.unwrap().as_deref(), Some("18"));

        // a second key in the same database is independent
        let audit = SledCursorStore {
            db: orders.db.clone(),
            path: dir.path().to_path_buf(),
            key: "audit-CreatedAt".into(),
        };
        assert_eq!(audit.read_or_default("1970-01-01").await, "1970-01-01");
    }

    #[tokio::test]
    async fn clear_removes_only_when_present() {
        let dir = tempdir().unwrap();
        let store = SledCursorStore::open(dir.path(), "events-Id").unwrap();
        store.save("99").await.unwrap();

        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
        assert_eq!(store.load().await.unwrap(), None);
    }
}
