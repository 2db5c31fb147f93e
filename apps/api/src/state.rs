use std::sync::Arc;

use sqlx::PgPool;

use crate::cipher::FieldCipher;
use crate::upload::store::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable file store. Backend selected by `STORAGE_BACKEND`.
    pub store: Arc<dyn FileStore>,
    /// Field Cipher for PII columns, constructed once at startup.
    pub cipher: Arc<FieldCipher>,
}
