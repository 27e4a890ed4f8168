//! SQL schema definitions and migrations.
//!
//! The warehouse layout is four tables forming a strict tree:
//!
//! ```text
//! mapas 1--N corredores 1--N prateleiras 1--N localizacoes
//! ```
//!
//! Every child row references its parent with `ON DELETE CASCADE`, so
//! removing a map can never leave orphans behind even if a caller skips the
//! explicit child-first deletes.
//!
//! # Migration System
//!
//! Migrations are code-based rather than SQL files because the two supported
//! dialects disagree on auto-increment keys. Each migration is a function that
//! receives the backend and can branch on [`DbKind`].
//!
//! ## Adding a New Migration
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vN_to_vM` async function
//! 3. Add the migration to the match statement in `run_migration`

use crate::Result;
use crate::backend::errors::BackendError;

use super::{DbKind, SqlxBackend};

/// Current schema version.
///
/// Increment this when making schema changes that require migration.
pub const SCHEMA_VERSION: i64 = 1;

/// Table holding warehouse maps.
pub const MAPS_TABLE: &str = "mapas";
/// Table holding aisles (runners).
pub const AISLES_TABLE: &str = "corredores";
/// Table holding shelves.
pub const SHELVES_TABLE: &str = "prateleiras";
/// Table holding storage locations.
pub const LOCATIONS_TABLE: &str = "localizacoes";

/// Auto-assigned integer primary key column for the given dialect.
fn id_column(kind: DbKind, name: &str) -> String {
    match kind {
        DbKind::Sqlite => format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT"),
        DbKind::Postgres => format!("{name} BIGSERIAL PRIMARY KEY"),
    }
}

/// SQL statements creating the schema tables, parents before children.
pub fn create_tables(kind: DbKind) -> Vec<String> {
    vec![
        // BIGINT (64-bit) used for portability between SQLite and PostgreSQL
        "CREATE TABLE IF NOT EXISTS schema_version (
            version BIGINT PRIMARY KEY
        )"
        .to_string(),
        // Unique names back the duplicate-name check against concurrent creates
        format!(
            "CREATE TABLE IF NOT EXISTS mapas (
                {},
                nome VARCHAR(100) NOT NULL UNIQUE
            )",
            id_column(kind, "mapa_id")
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS corredores (
                {},
                mapa_id BIGINT NOT NULL REFERENCES mapas(mapa_id) ON DELETE CASCADE,
                nome VARCHAR(50) NOT NULL
            )",
            id_column(kind, "corredor_id")
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS prateleiras (
                {},
                corredor_id BIGINT NOT NULL REFERENCES corredores(corredor_id) ON DELETE CASCADE,
                codigo VARCHAR(50) NOT NULL,
                capacidade BIGINT
            )",
            id_column(kind, "prateleira_id")
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS localizacoes (
                {},
                prateleira_id BIGINT NOT NULL REFERENCES prateleiras(prateleira_id) ON DELETE CASCADE,
                codigo_local VARCHAR(50) NOT NULL UNIQUE,
                etiqueta_id BIGINT,
                status VARCHAR(20) NOT NULL DEFAULT 'VAZIO'
            )",
            id_column(kind, "localizacao_id")
        ),
    ]
}

/// SQL statements to create indexes.
///
/// Foreign key columns are indexed so per-map lookups and cascades stay cheap.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_corredores_mapa ON corredores(mapa_id)",
    "CREATE INDEX IF NOT EXISTS idx_prateleiras_corredor ON prateleiras(corredor_id)",
    "CREATE INDEX IF NOT EXISTS idx_localizacoes_prateleira ON localizacoes(prateleira_id)",
];

/// Initialize the database schema.
///
/// Creates tables and indexes if they don't exist, and handles migrations
/// if the schema version has changed. Safe to run on every startup.
pub async fn initialize(backend: &SqlxBackend) -> Result<()> {
    let pool = backend.pool();

    for statement in create_tables(backend.kind()) {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .map_err(|e| BackendError::SqlxError {
                reason: format!("Schema creation failed: {e} - SQL: {statement}"),
                source: Some(e),
            })?;
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .map_err(|e| BackendError::SqlxError {
            reason: format!("Failed to check schema version: {e}"),
            source: Some(e),
        })?;

    match row {
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(SCHEMA_VERSION)
                .execute(pool)
                .await
                .map_err(|e| BackendError::SqlxError {
                    reason: format!("Failed to initialize schema version: {e}"),
                    source: Some(e),
                })?;
            tracing::info!(
                version = SCHEMA_VERSION,
                kind = backend.kind().as_str(),
                "Initialized warehouse schema"
            );
        }
        Some((current_version,)) if current_version < SCHEMA_VERSION => {
            migrate(backend, current_version, SCHEMA_VERSION).await?;
        }
        Some((current_version,)) if current_version > SCHEMA_VERSION => {
            return Err(BackendError::SchemaError {
                reason: format!(
                    "Database schema v{current_version} is newer than this build (v{SCHEMA_VERSION})"
                ),
            }
            .into());
        }
        Some(_) => {}
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| BackendError::SqlxError {
                reason: format!("Index creation failed: {e} - SQL: {statement}"),
                source: Some(e),
            })?;
    }

    Ok(())
}

/// Read the schema version recorded in the database.
pub async fn current_version(backend: &SqlxBackend) -> Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(backend.pool())
        .await
        .map_err(|e| BackendError::SqlxError {
            reason: format!("Failed to read schema version: {e}"),
            source: Some(e),
        })?;
    Ok(row.map(|(version,)| version))
}

/// Run migrations sequentially from one schema version to another.
async fn migrate(backend: &SqlxBackend, from: i64, to: i64) -> Result<()> {
    tracing::info!(from, to, "Starting SQL schema migration");

    let mut current = from;
    while current < to {
        let next = current + 1;
        tracing::info!(from = current, to = next, "Running migration");

        run_migration(backend, current, next).await?;

        sqlx::query("UPDATE schema_version SET version = $1")
            .bind(next)
            .execute(backend.pool())
            .await
            .map_err(|e| BackendError::SqlxError {
                reason: format!("Failed to update schema version to {next}: {e}"),
                source: Some(e),
            })?;

        tracing::info!(version = next, "Migration completed");
        current = next;
    }

    tracing::info!(from, to, "All migrations completed successfully");
    Ok(())
}

/// Execute a single migration step.
///
/// There are no migrations yet, so reaching this is always a build error:
/// `SCHEMA_VERSION` was bumped without adding the matching function.
async fn run_migration(backend: &SqlxBackend, from: i64, to: i64) -> Result<()> {
    let _ = backend;

    Err(BackendError::SchemaError {
        reason: format!(
            "Unknown migration path: v{from} to v{to}. \
             This likely means SCHEMA_VERSION was incremented without adding a migration."
        ),
    }
    .into())
}
