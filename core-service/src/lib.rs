//! Core service façade and bootstrap helpers.
//!
//! This crate turns a [`LibraryConfig`] into a ready-to-use lending core: it
//! opens the SQLite pool, applies the schema, wires the SQLite repositories
//! and the configured clock into a [`LibraryService`], and hands the result to
//! the host application.
//!
//! ```no_run
//! # async fn example() -> core_service::Result<()> {
//! use core_service::{CoreService, LibraryConfig};
//!
//! let config = LibraryConfig::builder()
//!     .database_path("library.db")
//!     .build()?;
//! let core = CoreService::bootstrap(config).await?;
//!
//! for book in core.library().search_books(None).await? {
//!     println!("{} by {} ({} available)", book.title, book.author, book.quantity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use core_runtime::config::{LibraryConfig, LibraryConfigBuilder};
pub use error::{CoreError, Result};

use std::sync::Arc;

use core_library::db::{create_pool, DatabaseConfig};
use core_library::repositories::{
    SqliteBookRepository, SqliteLoanRepository, SqliteStudentRepository,
};
use core_library::LibraryService;
use core_runtime::logging::{init_logging, strip_path};
use sqlx::SqlitePool;
use tracing::info;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    library: Arc<LibraryService>,
    pool: SqlitePool,
    not_returned_label: String,
}

impl CoreService {
    /// Open the database described by `config` and build the lending service.
    ///
    /// Logging is left alone; see [`bootstrap_with_logging`](Self::bootstrap_with_logging).
    ///
    /// # Errors
    ///
    /// - `Runtime` if the configuration is invalid
    /// - `Library` if the database cannot be opened or the schema applied
    pub async fn bootstrap(config: LibraryConfig) -> Result<Self> {
        config.validate()?;

        let path = config.database_path.to_string_lossy().into_owned();
        info!(database = strip_path(&path), "Bootstrapping library core");

        let db_config = DatabaseConfig::new(&config.database_path)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        let pool = create_pool(db_config).await?;

        let library = LibraryService::new(
            Arc::new(SqliteBookRepository::new(pool.clone())),
            Arc::new(SqliteStudentRepository::new(pool.clone())),
            Arc::new(SqliteLoanRepository::new(pool.clone())),
            config.clock.clone(),
        );

        info!("Library core ready");
        Ok(Self {
            library: Arc::new(library),
            pool,
            not_returned_label: config.not_returned_label,
        })
    }

    /// Install the global tracing subscriber from `config.logging`, then
    /// bootstrap.
    ///
    /// # Errors
    ///
    /// As [`bootstrap`](Self::bootstrap), plus `InitializationFailed` if a
    /// subscriber is already installed.
    pub async fn bootstrap_with_logging(config: LibraryConfig) -> Result<Self> {
        init_logging(config.logging.clone())
            .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;
        Self::bootstrap(config).await
    }

    /// The lending service.
    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    /// Placeholder to render for loans that have not been returned.
    pub fn not_returned_label(&self) -> &str {
        &self.not_returned_label
    }

    /// Close the connection pool, waiting for checked-out connections.
    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("Library core shut down");
    }
}
