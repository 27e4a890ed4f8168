//! Error types for warehouse layout operations.
//!
//! Display strings are returned to API clients as-is, so they are written in
//! the service's language (Portuguese), matching the rest of the wire contract.

use thiserror::Error;

use super::types::{AisleId, LocationId, MapId, ShelfId};

/// Errors raised by the warehouse operations themselves.
///
/// Storage failures are reported separately through
/// [`crate::backend::BackendError`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapError {
    /// Map name missing or blank after trimming.
    #[error("Nome do mapa é obrigatório.")]
    MissingName,

    /// Map name longer than the column allows.
    #[error("Nome do mapa deve ter no máximo {max} caracteres.")]
    NameTooLong {
        /// Maximum allowed length in characters
        max: usize,
    },

    /// A map with this name already exists.
    #[error("Já existe um mapa com este nome.")]
    DuplicateName {
        /// The rejected (trimmed) name
        name: String,
    },

    /// `numberRunners` is missing, non-numeric, or not a positive integer.
    #[error("Número de corredores inválido. Deve ser um número inteiro positivo.")]
    InvalidRunnerCount {
        /// The value as received
        value: String,
    },

    /// Search term missing or blank after trimming.
    #[error("Termo de pesquisa é obrigatório.")]
    MissingSearchTerm,

    /// Map id path parameter is not an integer.
    #[error("ID do mapa é obrigatório e deve ser um número válido.")]
    InvalidMapId {
        /// The raw path segment
        raw: String,
    },

    /// No map with this id.
    #[error("Mapa não encontrado.")]
    MapNotFound {
        /// The id that was looked up
        map_id: MapId,
    },

    /// A search matched no maps.
    #[error("Nenhum mapa encontrado para o termo pesquisado.")]
    NoMatches {
        /// The trimmed term that was searched for
        term: String,
    },

    /// No aisle with this id.
    #[error("Corredor não encontrado.")]
    AisleNotFound {
        /// The id that was looked up
        aisle_id: AisleId,
    },

    /// No shelf with this id.
    #[error("Prateleira não encontrada.")]
    ShelfNotFound {
        /// The id that was looked up
        shelf_id: ShelfId,
    },

    /// No location with this id.
    #[error("Localização não encontrada.")]
    LocationNotFound {
        /// The id that was looked up
        location_id: LocationId,
    },

    /// Shelf or location code missing, blank, or too long.
    #[error("Código de {kind} inválido: deve ter entre 1 e {max} caracteres.")]
    InvalidCode {
        /// What the code identifies ("prateleira" or "localização")
        kind: &'static str,
        /// Maximum allowed length in characters
        max: usize,
    },

    /// Shelf capacity below zero.
    #[error("Capacidade da prateleira não pode ser negativa.")]
    InvalidCapacity {
        /// The rejected capacity
        capacity: i64,
    },

    /// A location with this code already exists.
    #[error("Já existe uma localização com o código {code}.")]
    DuplicateLocationCode {
        /// The rejected code
        code: String,
    },

    /// Location status string not recognised.
    #[error("Status de localização desconhecido: {value}")]
    UnknownLocationStatus {
        /// The rejected status
        value: String,
    },
}

impl MapError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MapError::MapNotFound { .. }
                | MapError::NoMatches { .. }
                | MapError::AisleNotFound { .. }
                | MapError::ShelfNotFound { .. }
                | MapError::LocationNotFound { .. }
        )
    }

    /// Check if this error indicates a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            MapError::DuplicateName { .. } | MapError::DuplicateLocationCode { .. }
        )
    }

    /// Check if this error is a rejected input value.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            MapError::MissingName
                | MapError::NameTooLong { .. }
                | MapError::InvalidRunnerCount { .. }
                | MapError::MissingSearchTerm
                | MapError::InvalidMapId { .. }
                | MapError::InvalidCode { .. }
                | MapError::InvalidCapacity { .. }
                | MapError::UnknownLocationStatus { .. }
        )
    }

    /// Check if this error is about a required field that was not supplied.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, MapError::MissingName | MapError::MissingSearchTerm)
    }

    /// Get the map id if this error is about a specific map.
    pub fn map_id(&self) -> Option<MapId> {
        match self {
            MapError::MapNotFound { map_id } => Some(*map_id),
            _ => None,
        }
    }
}

// Conversion from MapError to the main Error type
impl From<MapError> for crate::Error {
    fn from(err: MapError) -> Self {
        crate::Error::Map(err)
    }
}
