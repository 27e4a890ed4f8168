//! Row-level SQL operations for the warehouse tables.
//!
//! Reads take the backend and use the pool directly. Writes that belong to a
//! larger unit of work take the open transaction instead, so
//! [`crate::warehouse::Warehouse`] decides the transaction boundaries.

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::schema::LOCATIONS_TABLE;
use crate::backend::{SqlTransaction, SqlxBackend, SqlxResultExt};
use crate::constants::AISLE_INSERT_BATCH;

use super::errors::MapError;
use super::runner_name;
use super::types::{
    Aisle, AisleId, LayoutStats, Location, LocationId, LocationStatus, Map, MapId, MapSummary, Shelf,
    ShelfId,
};

/// Convert a unique-constraint violation into `conflict`, anything else
/// into a backend error carrying `context`.
fn unique_or_sql(err: sqlx::Error, context: &str, conflict: MapError) -> crate::Error {
    let is_unique = matches!(&err, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
    if is_unique {
        conflict.into()
    } else {
        BackendError::SqlxError {
            reason: format!("{context}: {err}"),
            source: Some(err),
        }
        .into()
    }
}

/// Escape `%`, `_` and `\` so `term` matches literally inside a LIKE pattern.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ============================================================================
// Maps
// ============================================================================

/// Get a map by id.
pub async fn find_map(backend: &SqlxBackend, map_id: MapId) -> Result<Option<Map>> {
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT mapa_id, nome FROM mapas WHERE mapa_id = $1")
            .bind(map_id)
            .fetch_optional(backend.pool())
            .await
            .sql_context("Failed to get map")?;

    Ok(row.map(|(map_id, map_name)| Map { map_id, map_name }))
}

/// Get a map by exact name.
pub async fn find_map_by_name(backend: &SqlxBackend, name: &str) -> Result<Option<Map>> {
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT mapa_id, nome FROM mapas WHERE nome = $1")
            .bind(name)
            .fetch_optional(backend.pool())
            .await
            .sql_context("Failed to look up map by name")?;

    Ok(row.map(|(map_id, map_name)| Map { map_id, map_name }))
}

/// Maps whose name contains `term`, or whose id equals `id` when given.
pub async fn search_maps(backend: &SqlxBackend, term: &str, id: Option<MapId>) -> Result<Vec<Map>> {
    let pattern = format!("%{}%", escape_like(term));

    let rows: Vec<(i64, String)> = match id {
        Some(id) => sqlx::query_as(
            "SELECT mapa_id, nome FROM mapas
             WHERE mapa_id = $1 OR nome LIKE $2 ESCAPE '\\'
             ORDER BY mapa_id",
        )
        .bind(id)
        .bind(pattern)
        .fetch_all(backend.pool())
        .await,
        None => sqlx::query_as(
            "SELECT mapa_id, nome FROM mapas
             WHERE nome LIKE $1 ESCAPE '\\'
             ORDER BY mapa_id",
        )
        .bind(pattern)
        .fetch_all(backend.pool())
        .await,
    }
    .sql_context("Failed to search maps")?;

    Ok(rows
        .into_iter()
        .map(|(map_id, map_name)| Map { map_id, map_name })
        .collect())
}

/// Insert a map row and return its new id.
///
/// A concurrent insert of the same name surfaces as [`MapError::DuplicateName`].
pub async fn insert_map(tx: &mut SqlTransaction, name: &str) -> Result<MapId> {
    let (map_id,): (i64,) =
        sqlx::query_as("INSERT INTO mapas (nome) VALUES ($1) RETURNING mapa_id")
            .bind(name)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                unique_or_sql(
                    e,
                    "Failed to insert map",
                    MapError::DuplicateName {
                        name: name.to_string(),
                    },
                )
            })?;

    Ok(map_id)
}

/// Delete the map row. Returns the number of rows removed.
pub async fn delete_map_row(tx: &mut SqlTransaction, map_id: MapId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM mapas WHERE mapa_id = $1")
        .bind(map_id)
        .execute(&mut **tx)
        .await
        .sql_context("Failed to delete map")?;

    Ok(result.rows_affected())
}

/// Delete a map with its shelves and aisles, children first.
///
/// Returns the `(shelves, aisles)` removed. A map row that is already gone is
/// [`MapError::MapNotFound`], which rolls back the caller's transaction.
pub async fn delete_map_tree(tx: &mut SqlTransaction, map_id: MapId) -> Result<(u64, u64)> {
    let shelves = delete_shelves_of_map(tx, map_id).await?;
    let aisles = delete_aisles_of_map(tx, map_id).await?;
    if delete_map_row(tx, map_id).await? == 0 {
        return Err(MapError::MapNotFound { map_id }.into());
    }
    Ok((shelves, aisles))
}

// ============================================================================
// Aisles
// ============================================================================

/// Insert `Corredor 1`..`Corredor count` for `map_id`, in order.
///
/// Rows go in as multi-row `INSERT`s of at most [`AISLE_INSERT_BATCH`] rows.
/// Names are generated one batch at a time.
pub async fn insert_aisles(tx: &mut SqlTransaction, map_id: MapId, count: u32) -> Result<()> {
    for first in (1..=count).step_by(AISLE_INSERT_BATCH as usize) {
        let last = first.saturating_add(AISLE_INSERT_BATCH - 1).min(count);
        let names: Vec<String> = (first..=last).map(runner_name).collect();

        let placeholders: Vec<String> = (0..names.len())
            .map(|i| format!("(${}, ${})", 2 * i + 1, 2 * i + 2))
            .collect();
        let sql = format!(
            "INSERT INTO corredores (mapa_id, nome) VALUES {}",
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for name in &names {
            query = query.bind(map_id).bind(name.as_str());
        }

        query
            .execute(&mut **tx)
            .await
            .sql_context("Failed to insert aisles")?;
    }

    Ok(())
}

/// All aisles of a map in creation order.
pub async fn aisles_for_map(backend: &SqlxBackend, map_id: MapId) -> Result<Vec<Aisle>> {
    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        "SELECT corredor_id, mapa_id, nome FROM corredores
         WHERE mapa_id = $1
         ORDER BY corredor_id",
    )
    .bind(map_id)
    .fetch_all(backend.pool())
    .await
    .sql_context("Failed to get aisles")?;

    Ok(rows
        .into_iter()
        .map(|(runner_id, map_id, name)| Aisle {
            runner_id,
            map_id,
            name,
        })
        .collect())
}

/// Check that an aisle exists.
pub async fn aisle_exists(backend: &SqlxBackend, aisle_id: AisleId) -> Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT corredor_id FROM corredores WHERE corredor_id = $1")
            .bind(aisle_id)
            .fetch_optional(backend.pool())
            .await
            .sql_context("Failed to get aisle")?;

    Ok(row.is_some())
}

/// Delete every aisle of a map. Returns the number of rows removed.
pub async fn delete_aisles_of_map(tx: &mut SqlTransaction, map_id: MapId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM corredores WHERE mapa_id = $1")
        .bind(map_id)
        .execute(&mut **tx)
        .await
        .sql_context("Failed to delete aisles")?;

    Ok(result.rows_affected())
}

// ============================================================================
// Shelves
// ============================================================================

/// Number of shelves under all aisles of a map.
pub async fn count_shelves_for_map(backend: &SqlxBackend, map_id: MapId) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(p.prateleira_id) FROM prateleiras p
         INNER JOIN corredores c ON p.corredor_id = c.corredor_id
         WHERE c.mapa_id = $1",
    )
    .bind(map_id)
    .fetch_one(backend.pool())
    .await
    .sql_context("Failed to count shelves")?;

    Ok(count)
}

/// Every map with its shelf count, in one statement.
pub async fn map_summaries(backend: &SqlxBackend) -> Result<Vec<MapSummary>> {
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        "SELECT m.mapa_id, m.nome, COUNT(p.prateleira_id)
         FROM mapas m
         LEFT JOIN corredores c ON c.mapa_id = m.mapa_id
         LEFT JOIN prateleiras p ON p.corredor_id = c.corredor_id
         GROUP BY m.mapa_id, m.nome
         ORDER BY m.mapa_id",
    )
    .fetch_all(backend.pool())
    .await
    .sql_context("Failed to list map summaries")?;

    Ok(rows
        .into_iter()
        .map(|(map_id, map_name, total_occupied_shelves)| MapSummary {
            map_id,
            map_name,
            total_occupied_shelves,
        })
        .collect())
}

/// Insert a shelf under an aisle.
pub async fn insert_shelf(
    backend: &SqlxBackend,
    aisle_id: AisleId,
    code: &str,
    capacity: Option<i64>,
) -> Result<Shelf> {
    // NULL is written literally rather than bound: the Any driver only binds
    // concrete values.
    let row: (i64, i64, String, Option<i64>) = match capacity {
        Some(capacity) => sqlx::query_as(
            "INSERT INTO prateleiras (corredor_id, codigo, capacidade) VALUES ($1, $2, $3)
             RETURNING prateleira_id, corredor_id, codigo, capacidade",
        )
        .bind(aisle_id)
        .bind(code)
        .bind(capacity)
        .fetch_one(backend.pool())
        .await,
        None => sqlx::query_as(
            "INSERT INTO prateleiras (corredor_id, codigo, capacidade) VALUES ($1, $2, NULL)
             RETURNING prateleira_id, corredor_id, codigo, capacidade",
        )
        .bind(aisle_id)
        .bind(code)
        .fetch_one(backend.pool())
        .await,
    }
    .sql_context("Failed to insert shelf")?;

    let (shelf_id, runner_id, code, capacity) = row;
    Ok(Shelf {
        shelf_id,
        runner_id,
        code,
        capacity,
    })
}

/// Check that a shelf exists.
pub async fn shelf_exists(backend: &SqlxBackend, shelf_id: ShelfId) -> Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT prateleira_id FROM prateleiras WHERE prateleira_id = $1")
            .bind(shelf_id)
            .fetch_optional(backend.pool())
            .await
            .sql_context("Failed to get shelf")?;

    Ok(row.is_some())
}

/// Shelves of one aisle in id order.
pub async fn shelves_for_aisle(backend: &SqlxBackend, aisle_id: AisleId) -> Result<Vec<Shelf>> {
    let rows: Vec<(i64, i64, String, Option<i64>)> = sqlx::query_as(
        "SELECT prateleira_id, corredor_id, codigo, capacidade FROM prateleiras
         WHERE corredor_id = $1
         ORDER BY prateleira_id",
    )
    .bind(aisle_id)
    .fetch_all(backend.pool())
    .await
    .sql_context("Failed to get shelves")?;

    Ok(rows
        .into_iter()
        .map(|(shelf_id, runner_id, code, capacity)| Shelf {
            shelf_id,
            runner_id,
            code,
            capacity,
        })
        .collect())
}

/// Delete every shelf whose aisle belongs to `map_id`.
///
/// Their locations go with them through the schema's cascade.
pub async fn delete_shelves_of_map(tx: &mut SqlTransaction, map_id: MapId) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM prateleiras
         WHERE corredor_id IN (SELECT corredor_id FROM corredores WHERE mapa_id = $1)",
    )
    .bind(map_id)
    .execute(&mut **tx)
    .await
    .sql_context("Failed to delete shelves")?;

    Ok(result.rows_affected())
}

// ============================================================================
// Locations
// ============================================================================

type LocationRow = (i64, i64, String, Option<i64>, String);

fn location_from_row(row: LocationRow) -> Result<Location> {
    let (location_id, shelf_id, code, tag_id, status) = row;
    let status = status
        .parse::<LocationStatus>()
        .map_err(|e| BackendError::CorruptRow {
            table: LOCATIONS_TABLE,
            reason: format!("location {location_id}: {e}"),
        })?;
    Ok(Location {
        location_id,
        shelf_id,
        code,
        tag_id,
        status,
    })
}

/// Insert a location on a shelf, leaving the status at its column default.
pub async fn insert_location(
    backend: &SqlxBackend,
    shelf_id: ShelfId,
    code: &str,
    tag_id: Option<i64>,
) -> Result<Location> {
    let duplicate = || MapError::DuplicateLocationCode {
        code: code.to_string(),
    };

    let row: LocationRow = match tag_id {
        Some(tag_id) => sqlx::query_as(
            "INSERT INTO localizacoes (prateleira_id, codigo_local, etiqueta_id) VALUES ($1, $2, $3)
             RETURNING localizacao_id, prateleira_id, codigo_local, etiqueta_id, status",
        )
        .bind(shelf_id)
        .bind(code)
        .bind(tag_id)
        .fetch_one(backend.pool())
        .await,
        None => sqlx::query_as(
            "INSERT INTO localizacoes (prateleira_id, codigo_local, etiqueta_id) VALUES ($1, $2, NULL)
             RETURNING localizacao_id, prateleira_id, codigo_local, etiqueta_id, status",
        )
        .bind(shelf_id)
        .bind(code)
        .fetch_one(backend.pool())
        .await,
    }
    .map_err(|e| unique_or_sql(e, "Failed to insert location", duplicate()))?;

    location_from_row(row)
}

/// Locations on one shelf in id order.
pub async fn locations_for_shelf(backend: &SqlxBackend, shelf_id: ShelfId) -> Result<Vec<Location>> {
    let rows: Vec<LocationRow> = sqlx::query_as(
        "SELECT localizacao_id, prateleira_id, codigo_local, etiqueta_id, status FROM localizacoes
         WHERE prateleira_id = $1
         ORDER BY localizacao_id",
    )
    .bind(shelf_id)
    .fetch_all(backend.pool())
    .await
    .sql_context("Failed to get locations")?;

    rows.into_iter().map(location_from_row).collect()
}

/// Set a location's status. Returns the number of rows updated.
pub async fn update_location_status(
    backend: &SqlxBackend,
    location_id: LocationId,
    status: LocationStatus,
) -> Result<u64> {
    let result = sqlx::query("UPDATE localizacoes SET status = $1 WHERE localizacao_id = $2")
        .bind(status.as_str())
        .bind(location_id)
        .execute(backend.pool())
        .await
        .sql_context("Failed to update location status")?;

    Ok(result.rows_affected())
}

// ============================================================================
// Stats
// ============================================================================

/// Row counts of the four layout tables.
pub async fn layout_stats(backend: &SqlxBackend) -> Result<LayoutStats> {
    let (maps, aisles, shelves, locations): (i64, i64, i64, i64) = sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM mapas),
            (SELECT COUNT(*) FROM corredores),
            (SELECT COUNT(*) FROM prateleiras),
            (SELECT COUNT(*) FROM localizacoes)",
    )
    .fetch_one(backend.pool())
    .await
    .sql_context("Failed to count layout rows")?;

    Ok(LayoutStats {
        maps,
        aisles,
        shelves,
        locations,
    })
}
