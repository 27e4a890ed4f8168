//!
//! Warehouse: hierarchical warehouse layout storage behind a small HTTP API.
//!
//! ## Core Concepts
//!
//! * **Maps (`warehouse::Map`)**: a warehouse floor plan with a unique name.
//! * **Aisles (`warehouse::Aisle`)**: the runners of a map, generated as
//!   `"Corredor 1"`..`"Corredor N"` when the map is created and fixed afterwards.
//! * **Shelves (`warehouse::Shelf`)** and **Locations (`warehouse::Location`)**:
//!   the lower levels of the tree, each row owned by exactly one parent.
//! * **Backend (`backend::SqlxBackend`)**: the pooled SQL store (SQLite or
//!   PostgreSQL) holding all state, with cascading foreign keys.
//! * **Warehouse (`warehouse::Warehouse`)**: the operations. Writes run inside a
//!   single transaction via [`backend::SqlxBackend::in_transaction`].
//! * **Server (`server::router`)**: the axum router exposing the `/mapas` API.

pub mod backend;
pub mod constants;
pub mod protocol;
pub mod server;
pub mod warehouse;

/// Re-export the `Warehouse` facade for easier access.
pub use warehouse::Warehouse;

/// Result type used throughout the warehouse library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the warehouse library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured domain errors from the warehouse module
    #[error(transparent)]
    Map(warehouse::MapError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Map(_) => "warehouse",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Map(map_err) => map_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error is database/backend-related.
    pub fn is_database_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this error should surface as an internal failure.
    ///
    /// Anything that is not a caller mistake (validation, conflict, missing
    /// resource) counts as internal.
    pub fn is_internal(&self) -> bool {
        !(self.is_not_found() || self.is_conflict() || self.is_validation_error())
    }
}
