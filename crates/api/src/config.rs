use std::path::PathBuf;

/// Default upload size limit (100 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Where uploads live and how large a single request may be.
///
/// Handed to [`ListingManager`](crate::services::ListingManager) at
/// construction.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root of the upload tree (default: `uploads`).
    pub root: PathBuf,
    /// Maximum request body size for uploads, in bytes.
    pub max_upload_bytes: usize,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running locally.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8910`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://recherche-maison.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upload tree settings.
    pub uploads: UploadConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `8910`                           |
    /// | `DATABASE_URL`         | `sqlite://recherche-maison.db`   |
    /// | `CORS_ORIGINS`         | `http://localhost:8910`          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `UPLOADS_DIR`          | `uploads`                        |
    /// | `MAX_UPLOAD_BYTES`     | `104857600`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8910".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://recherche-maison.db".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8910".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let root = std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into());

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            uploads: UploadConfig {
                root: PathBuf::from(root),
                max_upload_bytes,
            },
        }
    }
}
