use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

/// Small string key/value store for client flags such as `walletConnected`.
#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn get_flag(&self, key: &str) -> Result<Option<String>>;
    async fn set_flag(&self, key: &str, value: &str) -> Result<()>;
    async fn remove_flag(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryFlagStore {
    flags: RwLock<BTreeMap<String, String>>,
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn get_flag(&self, key: &str) -> Result<Option<String>> {
        let guard = self.flags.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set_flag(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.flags.write().await;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_flag(&self, key: &str) -> Result<()> {
        let mut guard = self.flags.write().await;
        guard.remove(key);
        Ok(())
    }
}

/// Flags persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file; the store only ever holds a handful of keys.
pub struct JsonFileFlagStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read flag file: {}", self.path.display()));
            }
        };

        match serde_json::from_slice::<BTreeMap<String, String>>(&raw) {
            Ok(flags) => Ok(flags),
            Err(err) => {
                warn!("flag file {} is not valid JSON ({}); treating as empty", self.path.display(), err);
                Ok(BTreeMap::new())
            }
        }
    }

    async fn store(&self, flags: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create flag directory: {}", parent.display()))?;
            }
        }

        let body = serde_json::to_vec_pretty(flags)?;
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("failed to write flag file: {}", self.path.display()))
    }
}

#[async_trait]
impl FlagStore for JsonFileFlagStore {
    async fn get_flag(&self, key: &str) -> Result<Option<String>> {
        let flags = self.load().await?;
        Ok(flags.get(key).cloned())
    }

    async fn set_flag(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut flags = self.load().await?;
        flags.insert(key.to_owned(), value.to_owned());
        self.store(&flags).await
    }

    async fn remove_flag(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut flags = self.load().await?;
        if flags.remove(key).is_some() {
            self.store(&flags).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_set_get_remove() -> Result<()> {
        let store = InMemoryFlagStore::default();
        assert_eq!(store.get_flag("walletConnected").await?, None);

        store.set_flag("walletConnected", "true").await?;
        assert_eq!(store.get_flag("walletConnected").await?.as_deref(), Some("true"));

        store.remove_flag("walletConnected").await?;
        assert_eq!(store.get_flag("walletConnected").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn json_file_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state").join("flags.json");

        let store = JsonFileFlagStore::new(&path);
        assert_eq!(store.get_flag("walletConnected").await?, None);
        store.set_flag("walletConnected", "true").await?;

        let reopened = JsonFileFlagStore::new(&path);
        assert_eq!(reopened.get_flag("walletConnected").await?.as_deref(), Some("true"));

        reopened.remove_flag("walletConnected").await?;
        assert_eq!(store.get_flag("walletConnected").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_json_file_reads_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("flags.json");
        std::fs::write(&path, b"not json")?;

        let store = JsonFileFlagStore::new(&path);
        assert_eq!(store.get_flag("walletConnected").await?, None);

        store.set_flag("walletConnected", "true").await?;
        assert_eq!(store.get_flag("walletConnected").await?.as_deref(), Some("true"));
        Ok(())
    }
}
