mod candidates;
mod cipher;
mod config;
mod db;
mod errors;
mod models;
mod processes;
mod routes;
mod state;
mod stats;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cipher::FieldCipher;
use crate::config::{Config, S3Config, StorageBackend};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upload::gate::MAX_CV_BYTES;
use crate::upload::store::{DiskStore, FileStore, MemoryStore, S3Store};

/// Multipart bodies may carry a 5 MiB CV plus form fields and boundary
/// overhead; the gate enforces the real per-file limit.
const BODY_LIMIT_BYTES: usize = MAX_CV_BYTES as usize + 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Tracing targets use the crate name with underscores.
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_default_encryption_key() {
        warn!("ENCRYPTION_KEY is not set; PII fields are encrypted with the insecure default key");
    }

    // Initialize PostgreSQL (runs embedded migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize the file store backend
    let store: Arc<dyn FileStore> = match config.storage_backend {
        StorageBackend::Disk => {
            info!("File store: disk at {}", config.upload_dir.display());
            Arc::new(DiskStore::new(&config.upload_dir))
        }
        StorageBackend::Memory => {
            warn!("File store: in-memory; uploads are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::S3 => {
            let s3_config = config
                .s3
                .as_ref()
                .expect("S3 config present when backend is s3");
            info!("File store: s3 bucket {}", s3_config.bucket);
            Arc::new(S3Store::new(
                build_s3_client(s3_config).await,
                s3_config.bucket.clone(),
            ))
        }
    };

    // Initialize the field cipher
    let cipher = Arc::new(FieldCipher::new(&config.encryption_key));

    // Build app state
    let state = AppState { db, store, cipher };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "ats-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
