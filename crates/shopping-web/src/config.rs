//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use shopping_list::Database;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Built client assets, served at `/` when set.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SHOPPING_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:shopping.db?mode=rwc` |
    /// | `SQLITE_POOL_SIZE` | Connection pool size | `5` |
    /// | `STATIC_DIR` | Client assets directory | (none) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SHOPPING_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:shopping.db?mode=rwc".to_string());

        let pool_size = match env::var("SQLITE_POOL_SIZE") {
            Ok(value) => value
                .parse()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(value))?,
            Err(_) => Database::DEFAULT_POOL_SIZE,
        };

        let static_dir = env::var("STATIC_DIR")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            database_url,
            pool_size,
            static_dir,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SHOPPING_ADDR format")]
    InvalidAddr,

    #[error("Invalid SQLITE_POOL_SIZE: {0}")]
    InvalidPoolSize(String),
}
