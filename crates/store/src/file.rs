use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{error, warn};

use crate::errors::StoreError;
use crate::snapshot::{Snapshot, SnapshotStore};

/// JSON file-backed snapshot store.
///
/// Persists the full key space as a JSON array of `[key, value]` pairs and
/// rewrites the file in full on every save. O(total data size) per write;
/// intended for small-to-moderate datasets where a database is overkill.
pub struct FileStore {
    file_path: PathBuf,
}

impl FileStore {
    /// Point the store at a backing file. The file is not created here; it
    /// appears on the first successful save.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    /// Read the backing file. A missing file is an empty store; corrupt or
    /// non-array content is treated as no data, not as a fatal error.
    async fn load(&self) -> Snapshot {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Snapshot::new(),
            Err(e) => {
                error!(path = %self.file_path.display(), error = %e, "failed to read data file, starting empty");
                return Snapshot::new();
            }
        };
        if bytes.is_empty() {
            return Snapshot::new();
        }
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "data file is not a valid entry array, starting empty");
                Snapshot::new()
            }
        }
    }

    /// Overwrite the backing file with the full snapshot. No retry and no
    /// rollback of in-memory state on failure.
    async fn save(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        let data = serde_json::to_vec(&snapshot).map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "failed to serialize snapshot");
            StoreError::Serialize(e)
        })?;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.ok();
            }
        }
        fs::write(&self.file_path, data).await.map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "failed to write data file");
            StoreError::Io(e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("file_store_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let store = FileStore::new(temp_path());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn empty_file_loads_empty() -> Result<(), anyhow::Error> {
        let path = temp_path();
        fs::write(&path, b"").await?;
        let store = FileStore::new(&path);
        assert!(store.load().await.is_empty());
        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn non_array_content_loads_empty() -> Result<(), anyhow::Error> {
        let path = temp_path();
        fs::write(&path, b"\"not an array\"").await?;
        let store = FileStore::new(&path);
        assert!(store.load().await.is_empty());

        fs::write(&path, b"{ not json").await?;
        assert!(store.load().await.is_empty());

        fs::write(&path, b"[]").await?;
        assert!(store.load().await.is_empty());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = FileStore::new(&path);

        let snapshot: Snapshot = vec![
            ("a".to_string(), json!({"n": 1})),
            ("b".to_string(), json!(["x", "y"])),
            ("c".to_string(), json!("plain")),
        ];
        store.save(snapshot.clone()).await?;

        let mut loaded = store.load().await;
        let mut expected = snapshot;
        loaded.sort_by(|l, r| l.0.cmp(&r.0));
        expected.sort_by(|l, r| l.0.cmp(&r.0));
        assert_eq!(loaded, expected);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_in_full() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = FileStore::new(&path);

        store.save(vec![("a".into(), json!(1)), ("b".into(), json!(2))]).await?;
        store.save(vec![("c".into(), json!(3))]).await?;

        let loaded = store.load().await;
        assert_eq!(loaded, vec![("c".to_string(), json!(3))]);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn persisted_layout_is_pair_arrays() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = FileStore::new(&path);
        store.save(vec![("k".into(), json!({"a": 1}))]).await?;

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).await?)?;
        assert_eq!(raw, json!([["k", {"a": 1}]]));

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_creates_missing_parent_dir() -> Result<(), anyhow::Error> {
        let base = std::env::temp_dir().join(format!("file_store_dir_{}", Uuid::new_v4()));
        let path = base.join("data.json");
        let store = FileStore::new(&path);
        store.save(vec![("k".into(), json!(true))]).await?;
        assert_eq!(store.load().await.len(), 1);
        let _ = fs::remove_dir_all(&base).await;
        Ok(())
    }
}
