//! Directory-backed snapshot store: one `<key>.json` file per key

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SnapshotStore;
use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write beside the target and rename so readers never see a partial file
        let target = self.path_for(key);
        let temp = self.dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&temp, value).await?;
        tokio::fs::rename(&temp, &target).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        assert!(store.get("bibliographies").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested"));
        store.put("bibliographies", "[]".to_string()).await.unwrap();

        assert!(store.path_for("bibliographies").exists());
        assert_eq!(
            store.get("bibliographies").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(!store.dir().join(".bibliographies.json.tmp").exists());
    }
}
