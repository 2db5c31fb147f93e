use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Fallback cipher secret used when `ENCRYPTION_KEY` is unset.
/// Fine for local development, never for real deployments; `main` logs a
/// warning whenever this is in effect.
pub const DEFAULT_ENCRYPTION_KEY: &str = "dev-only-insecure-encryption-key";

/// Which `FileStore` backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Disk,
    Memory,
    S3,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "disk" => Ok(StorageBackend::Disk),
            "memory" => Ok(StorageBackend::Memory),
            "s3" => Ok(StorageBackend::S3),
            other => bail!("STORAGE_BACKEND must be one of disk|memory|s3, got '{other}'"),
        }
    }
}

/// S3/MinIO settings, required only when `STORAGE_BACKEND=s3`.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub encryption_key: String,
    pub storage_backend: StorageBackend,
    pub upload_dir: PathBuf,
    pub s3: Option<S3Config>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend = StorageBackend::parse(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "disk".to_string()),
        )?;

        let s3 = if storage_backend == StorageBackend::S3 {
            Some(S3Config {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            })
        } else {
            None
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            encryption_key: std::env::var("ENCRYPTION_KEY")
                .unwrap_or_else(|_| DEFAULT_ENCRYPTION_KEY.to_string()),
            storage_backend,
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            ),
            s3,
        })
    }

    /// True when the cipher is running on the hardcoded development secret.
    pub fn uses_default_encryption_key(&self) -> bool {
        self.encryption_key == DEFAULT_ENCRYPTION_KEY
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
