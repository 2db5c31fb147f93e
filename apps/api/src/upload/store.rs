//! File Store backends: disk (default), in-memory, and S3/MinIO.
//!
//! All backends serve files back through `GET /uploads/:name`, so `save`
//! returns the same relative URL shape regardless of where the bytes live.
//! Nothing links a file write to the database row that references it; the
//! handlers compensate with an explicit delete when the row write fails.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::errors::AppError;

/// Relative URL a stored file is reachable under.
pub fn public_url(name: &str) -> String {
    format!("/uploads/{name}")
}

/// Stored names come from the Storage Namer, but every backend still
/// rejects anything that could escape its root.
fn check_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::Storage(format!("illegal stored name '{name}'")));
    }
    Ok(())
}

/// Persistence backend for validated uploads.
///
/// `delete` of a missing file is a no-op, not an error: callers use it for
/// compensating cleanup and must be able to run it blindly.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` under `name` and return the file's relative URL.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, AppError>;

    /// Read a stored file back. Missing files are a `NotFound` error.
    async fn load(&self, name: &str) -> Result<Bytes, AppError>;

    /// Remove a stored file if present.
    async fn delete(&self, name: &str) -> Result<(), AppError>;
}

/// Disk-backed store rooted at a fixed directory, created on first use.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskStore { root: root.into() }
    }
}

#[async_trait]
impl FileStore for DiskStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, AppError> {
        check_name(name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Storage(format!("creating upload dir: {e}")))?;
        tokio::fs::write(self.root.join(name), bytes)
            .await
            .map_err(|e| AppError::Storage(format!("writing {name}: {e}")))?;
        Ok(public_url(name))
    }

    async fn load(&self, name: &str) -> Result<Bytes, AppError> {
        check_name(name)?;
        match tokio::fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("file {name} not found")))
            }
            Err(e) => Err(AppError::Storage(format!("reading {name}: {e}"))),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), AppError> {
        check_name(name)?;
        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("deleting {name}: {e}"))),
        }
    }
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.lock().expect("memory store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, AppError> {
        check_name(name)?;
        self.files
            .lock()
            .expect("memory store lock poisoned")
            .insert(name.to_string(), Bytes::copy_from_slice(bytes));
        Ok(public_url(name))
    }

    async fn load(&self, name: &str) -> Result<Bytes, AppError> {
        check_name(name)?;
        self.files
            .lock()
            .expect("memory store lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("file {name} not found")))
    }

    async fn delete(&self, name: &str) -> Result<(), AppError> {
        check_name(name)?;
        self.files
            .lock()
            .expect("memory store lock poisoned")
            .remove(name);
        Ok(())
    }
}

/// S3/MinIO-backed store. Object keys are the stored names, flat under
/// the configured bucket.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        S3Store {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl FileStore for S3Store {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, AppError> {
        check_name(name)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("s3 put {name}: {e}")))?;
        Ok(public_url(name))
    }

    async fn load(&self, name: &str) -> Result<Bytes, AppError> {
        check_name(name)?;
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()) == Some(true) {
                    AppError::NotFound(format!("file {name} not found"))
                } else {
                    AppError::Storage(format!("s3 get {name}: {e}"))
                }
            })?;
        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("s3 read {name}: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, name: &str) -> Result<(), AppError> {
        check_name(name)?;
        // S3 DeleteObject on a missing key already succeeds, which is the
        // no-op semantics the trait requires.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("s3 delete {name}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_save_load_delete() {
        let store = MemoryStore::new();
        let url = store.save("abc123.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(url, "/uploads/abc123.pdf");
        assert_eq!(store.load("abc123.pdf").await.unwrap().as_ref(), b"%PDF-1.4");

        store.delete("abc123.pdf").await.unwrap();
        assert!(matches!(
            store.load("abc123.pdf").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_delete_missing_is_noop() {
        let store = MemoryStore::new();
        assert!(store.delete("never-existed.pdf").await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_traversal_names() {
        let store = MemoryStore::new();
        assert!(store.save("../evil.pdf", b"x").await.is_err());
        assert!(store.save("a/b.pdf", b"x").await.is_err());
        assert!(store.load("..").await.is_err());
    }

    #[tokio::test]
    async fn test_disk_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().join("uploads"));

        let url = store.save("abc123.pdf", b"%PDF-1.4 body").await.unwrap();
        assert_eq!(url, "/uploads/abc123.pdf");
        assert_eq!(
            store.load("abc123.pdf").await.unwrap().as_ref(),
            b"%PDF-1.4 body"
        );

        store.delete("abc123.pdf").await.unwrap();
        assert!(matches!(
            store.load("abc123.pdf").await,
            Err(AppError::NotFound(_))
        ));
        // Deleting again is still fine.
        store.delete("abc123.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_disk_creates_root_on_first_save() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        let store = DiskStore::new(&root);
        store.save("x.pdf", b"data").await.unwrap();
        assert!(root.join("x.pdf").exists());
    }
}
