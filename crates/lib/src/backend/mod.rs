//! SQL storage backend for the warehouse layout.
//!
//! [`SqlxBackend`] owns a sqlx `AnyPool` and is the only handle the rest of
//! the crate uses to reach the database. It is constructed explicitly at
//! process start (or per test), cloned cheaply into request handlers, and
//! closed on shutdown.
//!
//! ## Available Databases
//!
//! - **SQLite** (feature: `sqlite`): file-backed or shared-cache in-memory
//! - **PostgreSQL** (feature: `postgres`): optionally isolated in its own schema
//!
//! The schema is created on connect, see [`schema`].

pub mod errors;
/// Schema definition and migration system.
pub mod schema;

pub use errors::BackendError;

use std::future::Future;
use std::pin::Pin;

use sqlx::AnyPool;
use sqlx::Executor;
use sqlx::any::AnyPoolOptions;

use crate::Result;

/// Boxed future returned by units of work passed to [`SqlxBackend::in_transaction`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An open transaction on the backend's pool.
pub type SqlTransaction = sqlx::Transaction<'static, sqlx::Any>;

/// Extension trait for sqlx Result types to simplify error handling.
///
/// Similar to `anyhow::Context`, this trait adds a method to convert
/// sqlx errors to `BackendError::SqlxError` with a context message.
pub(crate) trait SqlxResultExt<T> {
    /// Convert sqlx error to BackendError with context message.
    fn sql_context(self, context: &str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn sql_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            BackendError::SqlxError {
                reason: format!("{context}: {e}"),
                source: Some(e),
            }
            .into()
        })
    }
}

/// Database backend kind for SQL dialect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// SQLite database
    Sqlite,
    /// PostgreSQL database
    Postgres,
}

impl DbKind {
    /// Short lowercase name, as reported by the health endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            DbKind::Sqlite => "sqlite",
            DbKind::Postgres => "postgres",
        }
    }
}

/// Pooled SQL backend shared by every warehouse operation.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Clone)]
pub struct SqlxBackend {
    pool: AnyPool,
    kind: DbKind,
}

impl std::fmt::Debug for SqlxBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxBackend")
            .field("kind", &self.kind)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl SqlxBackend {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get the database kind.
    pub fn kind(&self) -> DbKind {
        self.kind
    }

    /// Check if this backend is using SQLite.
    pub fn is_sqlite(&self) -> bool {
        self.kind == DbKind::Sqlite
    }

    /// Check if this backend is using PostgreSQL.
    pub fn is_postgres(&self) -> bool {
        self.kind == DbKind::Postgres
    }

    /// Run `work` inside a single database transaction.
    ///
    /// The transaction is committed only if `work` returns `Ok`. Any error
    /// rolls it back and is returned unchanged, so no partial writes survive.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let id = backend
    ///     .in_transaction(move |tx| {
    ///         Box::pin(async move {
    ///             let (id,): (i64,) = sqlx::query_as("INSERT INTO mapas (nome) VALUES ($1) RETURNING mapa_id")
    ///                 .bind(name)
    ///                 .fetch_one(&mut **tx)
    ///                 .await
    ///                 .sql_context("Failed to insert map")?;
    ///             Ok(id)
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn in_transaction<T, F>(&self, work: F) -> Result<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut SqlTransaction) -> BoxFuture<'t, Result<T>> + Send,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .sql_context("Failed to begin transaction")?;

        match work(&mut tx).await {
            Ok(value) => {
                tx.commit()
                    .await
                    .sql_context("Failed to commit transaction")?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Transaction rollback failed");
                    return Err(BackendError::RollbackFailed {
                        original: err.to_string(),
                        source: rollback_err,
                    }
                    .into());
                }
                tracing::debug!(error = %err, "Transaction rolled back");
                Err(err)
            }
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!(kind = self.kind.as_str(), "Connection pool closed");
    }
}

// SQLite-specific implementations
#[cfg(feature = "sqlite")]
impl SqlxBackend {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub async fn open_sqlite<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        // mode=rwc: read-write-create (create file if it doesn't exist)
        let url = format!("sqlite:{}?mode=rwc", path.as_ref().display());
        Self::connect_sqlite(&url).await
    }

    /// Connect to a SQLite database using a connection URL.
    ///
    /// # Arguments
    ///
    /// * `url` - SQLite connection URL (e.g., "sqlite:./warehouse.db")
    pub async fn connect_sqlite(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let is_in_memory = url.contains("mode=memory");

        // Foreign keys (needed for cascading deletes) and the busy timeout
        // are per-connection settings in SQLite.
        let mut options = AnyPoolOptions::new()
            .max_connections(5)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
                        .await?;
                    Ok(())
                })
            });

        // A shared-cache in-memory database disappears with its last
        // connection, so keep one open for the lifetime of the pool.
        if is_in_memory {
            options = options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(url)
            .await
            .sql_context("Failed to connect to SQLite")?;

        // In-memory databases have no journal worth switching.
        if !is_in_memory {
            // - journal_mode=WAL: concurrent readers alongside one writer
            // - synchronous=NORMAL: safe with WAL
            sqlx::query(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
            .execute(&pool)
            .await
            .sql_context("Failed to configure SQLite")?;
        }

        let backend = Self {
            pool,
            kind: DbKind::Sqlite,
        };

        schema::initialize(&backend).await?;

        Ok(backend)
    }

    /// Create an in-memory SQLite database.
    ///
    /// The database lives as long as this backend (and its clones). Each call
    /// gets its own database, which keeps tests isolated.
    pub async fn sqlite_in_memory() -> Result<Self> {
        let unique_id = uuid::Uuid::new_v4();
        let url = format!("sqlite:file:warehouse_{unique_id}?mode=memory&cache=shared");
        Self::connect_sqlite(&url).await
    }
}

// PostgreSQL-specific implementations
#[cfg(feature = "postgres")]
impl SqlxBackend {
    /// Connect to a PostgreSQL database using a connection URL.
    ///
    /// Tables live in the default (public) schema. For test isolation use
    /// [`SqlxBackend::connect_postgres_isolated`].
    pub async fn connect_postgres(url: &str) -> Result<Self> {
        Self::connect_postgres_with_schema(url, None).await
    }

    /// Connect to PostgreSQL with a fresh, uniquely named schema.
    ///
    /// Every connection in the pool gets its `search_path` pointed at that
    /// schema, so parallel tests never see each other's rows.
    pub async fn connect_postgres_isolated(url: &str) -> Result<Self> {
        let schema_name = format!("warehouse_test_{}", uuid::Uuid::new_v4().simple());
        Self::connect_postgres_with_schema(url, Some(schema_name)).await
    }

    async fn connect_postgres_with_schema(url: &str, schema_name: Option<String>) -> Result<Self> {
        sqlx::any::install_default_drivers();

        if let Some(ref schema) = schema_name {
            let temp_pool = AnyPoolOptions::new()
                .max_connections(1)
                .connect(url)
                .await
                .sql_context("Failed to connect to PostgreSQL")?;

            let create_schema = format!("CREATE SCHEMA IF NOT EXISTS {schema}");
            sqlx::query(&create_schema)
                .execute(&temp_pool)
                .await
                .sql_context(&format!("Failed to create schema {schema}"))?;

            temp_pool.close().await;
        }

        let is_isolated = schema_name.is_some();
        let mut pool_options = AnyPoolOptions::new();
        if is_isolated {
            // Many tests in parallel: few connections each, wait rather than fail.
            pool_options = pool_options
                .max_connections(2)
                .acquire_timeout(std::time::Duration::from_secs(30));
        } else {
            pool_options = pool_options.max_connections(5);
        }

        let pool = pool_options
            .after_connect(move |conn, _meta| {
                let schema = schema_name.clone();
                Box::pin(async move {
                    if let Some(ref s) = schema {
                        let set_path = format!("SET search_path TO {s}");
                        conn.execute(set_path.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect(url)
            .await
            .sql_context("Failed to connect to PostgreSQL")?;

        let backend = Self {
            pool,
            kind: DbKind::Postgres,
        };

        schema::initialize(&backend).await?;

        Ok(backend)
    }
}
