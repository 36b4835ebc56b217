//! Durable copies of the store.
//!
//! The engine calls [`Persister::save`] after every successful mutation. The
//! in-memory state is already changed by then; a failed save is reported to
//! the caller but never rolled back.
use crate::store::StoreSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[async_trait]
pub trait Persister: Send + Sync {
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

/// Keeps everything in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPersister;

#[async_trait]
impl Persister for NoopPersister {
    async fn save(&self, _snapshot: &StoreSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Writes the whole snapshot as pretty JSON.
///
/// The file is replaced atomically: each save writes a fresh temp file in the
/// target's directory and renames it over the target. Ordering between saves
/// is the caller's job; the engine serializes them.
#[derive(Debug, Clone)]
pub struct JsonFilePersister {
    path: PathBuf,
}

impl JsonFilePersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[async_trait]
impl Persister for JsonFilePersister {
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot).context("encode store snapshot")?;
        let len = bytes.len();
        let dir = self.dir();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_replace(&dir, &path, &bytes))
            .await
            .context("join store save task")??;
        tracing::debug!(path = %self.path.display(), bytes = len, "store saved");
        Ok(())
    }
}

fn write_replace(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create data dir {}", dir.display()))?;
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .with_context(|| format!("write {}", temp.path().display()))?;
    temp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

/// Read a snapshot written by [`JsonFilePersister`]. A missing file yields
/// `None`; an unreadable or malformed one is an error.
pub async fn load_snapshot(path: &Path) -> Result<Option<StoreSnapshot>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let snapshot = serde_json::from_slice(&bytes)
        .with_context(|| format!("decode store snapshot {}", path.display()))?;
    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glmock_model::Role;

    #[tokio::test]
    async fn json_file_persister_round_trips_through_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("state.json");
        let persister = JsonFilePersister::new(&path);

        let mut role = Role::new("Ops", vec!["inputs:read".to_string()]);
        role.id = "0123456789abcdef01234567".to_string();
        let snapshot = StoreSnapshot {
            roles: vec![role],
            ..StoreSnapshot::default()
        };
        persister.save(&snapshot).await.expect("save");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().expect("parent"))
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("state.json")]);

        let loaded = load_snapshot(&path).await.expect("load").expect("present");
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn load_snapshot_missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = load_snapshot(&dir.path().join("absent.json"))
            .await
            .expect("load");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn load_snapshot_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"not json").await.expect("write");
        assert!(load_snapshot(&path).await.is_err());
    }
}
