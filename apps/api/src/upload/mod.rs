//! CV upload pipeline: Upload Gate -> Storage Namer -> File Store.

pub mod gate;
pub mod namer;
pub mod store;

use serde::Serialize;

use crate::errors::AppError;
use crate::upload::store::FileStore;

/// A validated, persisted upload. Created once at submission time and
/// never mutated; removed when the owning candidate row goes away or the
/// CV is replaced.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub stored_name: String,
    pub url: String,
}

/// Run a CV through the full pipeline. Validation failures reject before
/// anything is written; a store failure leaves nothing behind.
pub async fn store_cv(
    store: &dyn FileStore,
    original_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<UploadedFile, AppError> {
    gate::validate(original_name, mime_type, bytes.len() as u64)?;

    let stored_name = namer::stored_name(original_name);
    let url = store.save(&stored_name, bytes).await?;

    Ok(UploadedFile {
        original_name: original_name.to_string(),
        mime_type: mime_type.to_string(),
        size_bytes: bytes.len() as i64,
        stored_name,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::store::MemoryStore;

    #[tokio::test]
    async fn test_valid_pdf_is_stored() {
        let store = MemoryStore::new();
        let bytes = vec![0u8; 2 * 1024 * 1024];

        let uploaded = store_cv(&store, "test-cv.pdf", gate::PDF_MIME, &bytes)
            .await
            .unwrap();

        assert!(uploaded.url.starts_with("/uploads/"));
        assert!(uploaded.url.ends_with(".pdf"));
        assert_ne!(uploaded.stored_name, "test-cv.pdf");
        assert_eq!(uploaded.size_bytes, bytes.len() as i64);
        assert_eq!(
            store.load(&uploaded.stored_name).await.unwrap().len(),
            bytes.len()
        );
    }

    #[tokio::test]
    async fn test_txt_rejected_and_nothing_written() {
        let store = MemoryStore::new();
        let err = store_cv(&store, "test.txt", "text/plain", b"hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_oversize_pdf_rejected_and_nothing_written() {
        let store = MemoryStore::new();
        let bytes = vec![0u8; 6 * 1024 * 1024];
        let err = store_cv(&store, "big.pdf", gate::PDF_MIME, &bytes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("too large")));
        assert!(store.is_empty());
    }
}
