//! Domain types for the warehouse layout.
//!
//! These types are also the JSON shapes returned by the API, so they
//! serialize with camelCase field names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::MapError;
use crate::constants::MAX_RUNNERS;

/// Identifier of a map (`mapas.mapa_id`).
pub type MapId = i64;
/// Identifier of an aisle (`corredores.corredor_id`).
pub type AisleId = i64;
/// Identifier of a shelf (`prateleiras.prateleira_id`).
pub type ShelfId = i64;
/// Identifier of a location (`localizacoes.localizacao_id`).
pub type LocationId = i64;

/// A warehouse map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    pub map_id: MapId,
    pub map_name: String,
}

/// An aisle (runner) of a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aisle {
    pub runner_id: AisleId,
    pub map_id: MapId,
    pub name: String,
}

/// A shelf inside an aisle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelf {
    pub shelf_id: ShelfId,
    pub runner_id: AisleId,
    pub code: String,
    pub capacity: Option<i64>,
}

/// A storage location on a shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_id: LocationId,
    pub shelf_id: ShelfId,
    pub code: String,
    pub tag_id: Option<i64>,
    pub status: LocationStatus,
}

/// Occupancy status of a location, stored as text in `localizacoes.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationStatus {
    /// Nothing stored. Default for new locations.
    #[default]
    #[serde(rename = "VAZIO")]
    Empty,
    #[serde(rename = "OCUPADO")]
    Occupied,
    #[serde(rename = "RESERVADO")]
    Reserved,
    #[serde(rename = "BLOQUEADO")]
    Blocked,
}

impl LocationStatus {
    /// The stored text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Empty => "VAZIO",
            LocationStatus::Occupied => "OCUPADO",
            LocationStatus::Reserved => "RESERVADO",
            LocationStatus::Blocked => "BLOQUEADO",
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationStatus {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VAZIO" => Ok(LocationStatus::Empty),
            "OCUPADO" => Ok(LocationStatus::Occupied),
            "RESERVADO" => Ok(LocationStatus::Reserved),
            "BLOQUEADO" => Ok(LocationStatus::Blocked),
            other => Err(MapError::UnknownLocationStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// `numberRunners` exactly as a client sent it.
///
/// Clients send either a JSON number or a numeric string, so validation is
/// deferred to [`RunnerCount::positive`] and the raw value is kept for error
/// reporting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunnerCount {
    Number(serde_json::Number),
    Text(String),
    /// Field absent or `null`.
    #[default]
    Missing,
}

impl RunnerCount {
    /// The requested number of aisles, if it is a positive integer.
    ///
    /// Integral floats (`3.0`) are accepted; fractional values, zero,
    /// negatives and counts above [`MAX_RUNNERS`] are not.
    pub fn positive(&self) -> Option<u32> {
        let count = match self {
            RunnerCount::Number(n) => {
                if let Some(value) = n.as_u64() {
                    value
                } else {
                    let value = n.as_f64()?;
                    if value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
                        return None;
                    }
                    value as u64
                }
            }
            RunnerCount::Text(s) => s.trim().parse::<u64>().ok()?,
            RunnerCount::Missing => return None,
        };
        match u32::try_from(count) {
            Ok(count) if (1..=MAX_RUNNERS).contains(&count) => Some(count),
            _ => None,
        }
    }
}

impl fmt::Display for RunnerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerCount::Number(n) => write!(f, "{n}"),
            RunnerCount::Text(s) => f.write_str(s),
            RunnerCount::Missing => f.write_str("null"),
        }
    }
}

impl From<i32> for RunnerCount {
    fn from(value: i32) -> Self {
        RunnerCount::Number(value.into())
    }
}

impl From<i64> for RunnerCount {
    fn from(value: i64) -> Self {
        RunnerCount::Number(value.into())
    }
}

impl From<&str> for RunnerCount {
    fn from(value: &str) -> Self {
        RunnerCount::Text(value.to_string())
    }
}

/// Result of the map-creation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMap {
    pub map_id: MapId,
    pub map_name: String,
    pub number_runners: usize,
    pub runners: Vec<Aisle>,
}

/// Result of the map-deletion transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMap {
    pub map_id: MapId,
    /// Name the map had before deletion.
    pub name: String,
}

/// Aisle as shown inside search results: id and name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSummary {
    pub runner_id: AisleId,
    pub name: String,
}

impl From<Aisle> for RunnerSummary {
    fn from(aisle: Aisle) -> Self {
        Self {
            runner_id: aisle.runner_id,
            name: aisle.name,
        }
    }
}

/// One entry of the map listing.
///
/// `total_occupied_shelves` keeps its historical wire name but counts every
/// shelf under the map's aisles, whatever the status of their locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub map_id: MapId,
    pub map_name: String,
    pub total_occupied_shelves: i64,
}

/// A map with its aisles, as returned by search and `get_map`.
///
/// `total_occupied_shelves` has the same meaning as in [`MapSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDetail {
    pub map_id: MapId,
    pub map_name: String,
    pub total_runners: usize,
    pub total_occupied_shelves: i64,
    pub runners: Vec<RunnerSummary>,
}

/// Maps matched by a search, with the trimmed term that matched them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSearch {
    pub term: String,
    pub maps: Vec<MapDetail>,
}

/// Row counts for every table of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub maps: i64,
    pub aisles: i64,
    pub shelves: i64,
    pub locations: i64,
}
