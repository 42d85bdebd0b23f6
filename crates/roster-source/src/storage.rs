//! Object storage capability and reference backends.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SourceError};

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub size: u64,
    pub content_type: String,
}

pub trait ObjectStorage {
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<StoredObject>> + Send;

    fn remove(&self, bucket: &str, path: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Keeps objects in memory and counts upload calls.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    uploads: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upload calls that reached the backend.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::Relaxed)
    }

    pub fn get(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }
}

impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject> {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        let size = bytes.len() as u64;
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bucket.to_string(), path.to_string()), bytes);
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
            size,
            content_type: content_type.to_string(),
        })
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let removed = self
            .objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(bucket.to_string(), path.to_string()));
        match removed {
            Some(_) => Ok(()),
            None => Err(SourceError::not_found(bucket, path)),
        }
    }
}

/// Stores objects as files under `<base>/<bucket>/<path>`.
#[derive(Debug, Clone)]
pub struct DirStorage {
    base_dir: PathBuf,
}

impl DirStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if escapes || bucket.contains(['/', '\\']) {
            return Err(SourceError::Rejected(format!("invalid object path: {bucket}/{path}")));
        }
        Ok(self.base_dir.join(bucket).join(relative))
    }
}

impl ObjectStorage for DirStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SourceError::Io {
                    operation: "create directory",
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let size = bytes.len() as u64;
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|source| SourceError::Io {
                operation: "write",
                path: target.clone(),
                source,
            })?;
        info!(bucket, path, size, "stored object");
        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
            size,
            content_type: content_type.to_string(),
        })
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        tokio::fs::remove_file(&target)
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => SourceError::not_found(bucket, path),
                _ => SourceError::Io {
                    operation: "remove",
                    path: target.clone(),
                    source,
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dir_storage_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirStorage::new(dir.path());
        let err = storage
            .upload("docs", "../outside.txt", b"x".to_vec(), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Rejected(_)));

        let stored = storage
            .upload("docs", "acme/a.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();
        assert_eq!(stored.size, 5);
        assert!(dir.path().join("docs/acme/a.txt").exists());
        storage.remove("docs", "acme/a.txt").await.unwrap();
        assert!(storage.remove("docs", "acme/a.txt").await.is_err());
    }
}
