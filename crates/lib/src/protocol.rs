//! Request and response bodies of the HTTP API.
//!
//! Field names are camelCase on the wire. Request fields are all optional at
//! the serde level so that a missing field reaches validation and produces
//! the service's own error message instead of a deserialization failure.

use serde::{Deserialize, Serialize};

use crate::constants::{MSG_MAP_CREATED, MSG_MAP_DELETED};
use crate::warehouse::{CreatedMap, DeletedMap, MapDetail, MapSearch, RunnerCount};

/// Body of `POST /mapas/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapRequest {
    #[serde(default)]
    pub map_name: Option<String>,
    #[serde(default)]
    pub number_runners: RunnerCount,
}

/// Response of a successful map creation (201).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMapResponse {
    pub message: String,
    pub map: CreatedMap,
}

impl From<CreatedMap> for CreateMapResponse {
    fn from(map: CreatedMap) -> Self {
        Self {
            message: MSG_MAP_CREATED.to_string(),
            map,
        }
    }
}

/// Body of `POST /mapas/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: Option<String>,
}

/// Response of a search with at least one match (200).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub message: String,
    pub term: String,
    pub maps: Vec<MapDetail>,
}

impl From<MapSearch> for SearchResponse {
    fn from(search: MapSearch) -> Self {
        Self {
            message: format!("{} mapa(s) encontrado(s)", search.maps.len()),
            term: search.term,
            maps: search.maps,
        }
    }
}

/// Response of a search with no matches (404).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMissResponse {
    pub message: String,
    pub term: String,
}

/// Response of a successful map deletion (200).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMapResponse {
    pub message: String,
    pub deleted_map: DeletedMap,
}

impl From<DeletedMap> for DeleteMapResponse {
    fn from(deleted_map: DeletedMap) -> Self {
        Self {
            message: MSG_MAP_DELETED.to_string(),
            deleted_map,
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
}
