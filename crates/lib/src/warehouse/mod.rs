//! Warehouse layout operations.
//!
//! [`Warehouse`] is the entry point for everything the service does with the
//! map hierarchy:
//!
//! - **Map creation**: validate, then insert the map and its generated aisles
//!   in one transaction.
//! - **Map deletion**: remove shelves, aisles and the map (child before parent)
//!   in one transaction. Locations follow their shelves through the schema
//!   cascade.
//! - **Listing and search**: aggregate each map with its aisles and shelf
//!   count.
//!
//! Nothing is cached between calls; every operation reads the store.

pub mod errors;
pub mod storage;
pub mod types;

pub use errors::MapError;
pub use types::{
    Aisle, AisleId, CreatedMap, DeletedMap, LayoutStats, Location, LocationId, LocationStatus, Map,
    MapDetail, MapId, MapSearch, MapSummary, RunnerCount, RunnerSummary, Shelf, ShelfId,
};

use crate::Result;
use crate::backend::SqlxBackend;
use crate::constants::{MAX_CODE_LEN, MAX_MAP_NAME_LEN, RUNNER_NAME_PREFIX};

/// Name of the `number`-th aisle generated for a new map (`"Corredor 3"`).
pub fn runner_name(number: u32) -> String {
    format!("{RUNNER_NAME_PREFIX} {number}")
}

/// Trim and check a map name.
pub fn validate_map_name(raw: &str) -> std::result::Result<String, MapError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(MapError::MissingName);
    }
    if name.chars().count() > MAX_MAP_NAME_LEN {
        return Err(MapError::NameTooLong {
            max: MAX_MAP_NAME_LEN,
        });
    }
    Ok(name.to_string())
}

/// Parse a map id taken from a request path.
pub fn parse_map_id(raw: &str) -> std::result::Result<MapId, MapError> {
    raw.trim()
        .parse::<MapId>()
        .map_err(|_| MapError::InvalidMapId {
            raw: raw.to_string(),
        })
}

/// Read a search term as a map id when it denotes a whole number.
///
/// Besides plain digits this takes decimal forms with a zero fraction
/// (`"5.0"`), exponents (`"1e1"`) and `0x`/`0o`/`0b` literals.
pub fn term_as_map_id(term: &str) -> Option<MapId> {
    let term = term.trim();
    if let Ok(id) = term.parse::<MapId>() {
        return Some(id);
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = term.strip_prefix(prefix) {
            return if digits.starts_with(['+', '-']) {
                None
            } else {
                MapId::from_str_radix(digits, radix).ok()
            };
        }
    }

    let value: f64 = term.parse().ok()?;
    let in_range = value >= MapId::MIN as f64 && value < MapId::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as MapId)
}

fn validate_code(raw: &str, kind: &'static str) -> std::result::Result<String, MapError> {
    let code = raw.trim();
    if code.is_empty() || code.chars().count() > MAX_CODE_LEN {
        return Err(MapError::InvalidCode {
            kind,
            max: MAX_CODE_LEN,
        });
    }
    Ok(code.to_string())
}

/// Handle for all warehouse layout operations.
///
/// Wraps the [`SqlxBackend`] it was constructed with; clones share the pool.
#[derive(Debug, Clone)]
pub struct Warehouse {
    backend: SqlxBackend,
}

impl Warehouse {
    /// Create a warehouse over an already-initialized backend.
    pub fn new(backend: SqlxBackend) -> Self {
        Self { backend }
    }

    /// Get the underlying backend.
    pub fn backend(&self) -> &SqlxBackend {
        &self.backend
    }

    /// Release the backend's connections. Call once at shutdown.
    pub async fn close(&self) {
        self.backend.close().await;
    }

    /// Create a map with `number_runners` generated aisles.
    ///
    /// Checks run in this order: blank name, duplicate name, invalid count.
    /// The map row and all aisle rows are written in one transaction; if any
    /// insert fails nothing is kept. A concurrent create of the same name is
    /// caught by the unique constraint and reported as the same conflict.
    pub async fn create_map(
        &self,
        map_name: &str,
        number_runners: impl Into<RunnerCount>,
    ) -> Result<CreatedMap> {
        let map_name = validate_map_name(map_name)?;

        if storage::find_map_by_name(&self.backend, &map_name)
            .await?
            .is_some()
        {
            return Err(MapError::DuplicateName { name: map_name }.into());
        }

        let number_runners = number_runners.into();
        let count = number_runners
            .positive()
            .ok_or_else(|| MapError::InvalidRunnerCount {
                value: number_runners.to_string(),
            })?;

        let name = map_name.clone();
        let map_id = self
            .backend
            .in_transaction(move |tx| {
                Box::pin(async move {
                    let map_id = storage::insert_map(tx, &name).await?;
                    storage::insert_aisles(tx, map_id, count).await?;
                    Ok(map_id)
                })
            })
            .await?;

        let runners = storage::aisles_for_map(&self.backend, map_id).await?;
        tracing::info!(
            map_id,
            map_name = %map_name,
            runners = runners.len(),
            "Created map"
        );

        Ok(CreatedMap {
            map_id,
            map_name,
            number_runners: runners.len(),
            runners,
        })
    }

    /// Delete a map and everything beneath it.
    ///
    /// Shelves (and, by cascade, their locations) go first, then aisles, then
    /// the map row, all in one transaction.
    pub async fn delete_map(&self, map_id: MapId) -> Result<DeletedMap> {
        let map = storage::find_map(&self.backend, map_id)
            .await?
            .ok_or(MapError::MapNotFound { map_id })?;

        // The map may vanish between the lookup and the transaction.
        let (shelves, aisles) = self
            .backend
            .in_transaction(move |tx| Box::pin(storage::delete_map_tree(tx, map_id)))
            .await?;

        tracing::info!(
            map_id,
            map_name = %map.map_name,
            aisles,
            shelves,
            "Deleted map"
        );

        Ok(DeletedMap {
            map_id,
            name: map.map_name,
        })
    }

    /// Delete a map given the raw id from a request path.
    pub async fn delete_map_by_raw_id(&self, raw: &str) -> Result<DeletedMap> {
        let map_id = parse_map_id(raw)?;
        self.delete_map(map_id).await
    }

    /// Every map with its shelf count, in id order.
    pub async fn list_maps(&self) -> Result<Vec<MapSummary>> {
        storage::map_summaries(&self.backend).await
    }

    /// Find maps by id or name.
    ///
    /// An integer term matches a map with that id or any name containing the
    /// term; any other term matches names only. Zero matches is
    /// [`MapError::NoMatches`].
    pub async fn search_maps(&self, term: &str) -> Result<MapSearch> {
        let term = term.trim();
        if term.is_empty() {
            return Err(MapError::MissingSearchTerm.into());
        }

        let id = term_as_map_id(term);
        let maps = storage::search_maps(&self.backend, term, id).await?;
        tracing::debug!(term, by_id = id.is_some(), matches = maps.len(), "Searched maps");

        if maps.is_empty() {
            return Err(MapError::NoMatches {
                term: term.to_string(),
            }
            .into());
        }

        let mut details = Vec::with_capacity(maps.len());
        for map in maps {
            details.push(self.map_detail(map).await?);
        }

        Ok(MapSearch {
            term: term.to_string(),
            maps: details,
        })
    }

    /// One map with its aisles and shelf count.
    pub async fn get_map(&self, map_id: MapId) -> Result<MapDetail> {
        let map = storage::find_map(&self.backend, map_id)
            .await?
            .ok_or(MapError::MapNotFound { map_id })?;
        self.map_detail(map).await
    }

    async fn map_detail(&self, map: Map) -> Result<MapDetail> {
        let runners: Vec<RunnerSummary> = storage::aisles_for_map(&self.backend, map.map_id)
            .await?
            .into_iter()
            .map(RunnerSummary::from)
            .collect();
        let total_occupied_shelves =
            storage::count_shelves_for_map(&self.backend, map.map_id).await?;

        Ok(MapDetail {
            map_id: map.map_id,
            map_name: map.map_name,
            total_runners: runners.len(),
            total_occupied_shelves,
            runners,
        })
    }

    /// All aisles of a map, in creation order.
    pub async fn aisles(&self, map_id: MapId) -> Result<Vec<Aisle>> {
        if storage::find_map(&self.backend, map_id).await?.is_none() {
            return Err(MapError::MapNotFound { map_id }.into());
        }
        storage::aisles_for_map(&self.backend, map_id).await
    }

    /// Add a shelf to an aisle.
    pub async fn create_shelf(
        &self,
        aisle_id: AisleId,
        code: &str,
        capacity: Option<i64>,
    ) -> Result<Shelf> {
        let code = validate_code(code, "prateleira")?;
        if let Some(capacity) = capacity
            && capacity < 0
        {
            return Err(MapError::InvalidCapacity { capacity }.into());
        }
        if !storage::aisle_exists(&self.backend, aisle_id).await? {
            return Err(MapError::AisleNotFound { aisle_id }.into());
        }

        let shelf = storage::insert_shelf(&self.backend, aisle_id, &code, capacity).await?;
        tracing::debug!(shelf_id = shelf.shelf_id, aisle_id, "Created shelf");
        Ok(shelf)
    }

    /// Shelves of an aisle, in id order.
    pub async fn shelves(&self, aisle_id: AisleId) -> Result<Vec<Shelf>> {
        storage::shelves_for_aisle(&self.backend, aisle_id).await
    }

    /// Add a location to a shelf. New locations start out [`LocationStatus::Empty`].
    pub async fn create_location(
        &self,
        shelf_id: ShelfId,
        code: &str,
        tag_id: Option<i64>,
    ) -> Result<Location> {
        let code = validate_code(code, "localização")?;
        if !storage::shelf_exists(&self.backend, shelf_id).await? {
            return Err(MapError::ShelfNotFound { shelf_id }.into());
        }

        let location = storage::insert_location(&self.backend, shelf_id, &code, tag_id).await?;
        tracing::debug!(location_id = location.location_id, shelf_id, "Created location");
        Ok(location)
    }

    /// Locations on a shelf, in id order.
    pub async fn locations(&self, shelf_id: ShelfId) -> Result<Vec<Location>> {
        storage::locations_for_shelf(&self.backend, shelf_id).await
    }

    /// Change the status of a location.
    pub async fn set_location_status(
        &self,
        location_id: LocationId,
        status: LocationStatus,
    ) -> Result<()> {
        if storage::update_location_status(&self.backend, location_id, status).await? == 0 {
            return Err(MapError::LocationNotFound { location_id }.into());
        }
        Ok(())
    }

    /// Row counts across the whole layout.
    pub async fn stats(&self) -> Result<LayoutStats> {
        storage::layout_stats(&self.backend).await
    }
}
