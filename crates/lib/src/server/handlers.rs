//! Route handlers.
//!
//! Handlers only translate between HTTP and [`Warehouse`]; every rule lives in
//! the warehouse module.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::Error;
use crate::constants::{MSG_NO_MATCHES, SERVICE_BANNER};
use crate::protocol::{
    CreateMapRequest, CreateMapResponse, DeleteMapResponse, HealthResponse, SearchMissResponse,
    SearchRequest, SearchResponse,
};
use crate::warehouse::{MapError, MapSummary, Warehouse};

/// `GET /`
pub async fn root() -> &'static str {
    SERVICE_BANNER
}

/// `GET /health`
pub async fn health(State(warehouse): State<Warehouse>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        backend: warehouse.backend().kind().as_str().to_string(),
    })
}

/// `POST /mapas/create`
pub async fn create_map(
    State(warehouse): State<Warehouse>,
    payload: Result<Json<CreateMapRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateMapResponse>), ApiError> {
    let Json(request) = payload?;
    let map_name = request.map_name.unwrap_or_default();

    let created = warehouse
        .create_map(&map_name, request.number_runners)
        .await
        .map_err(|e| ApiError::from_warehouse(e, "create_map", "Erro ao criar mapa"))?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// `GET /mapas/list`
pub async fn list_maps(
    State(warehouse): State<Warehouse>,
) -> Result<Json<Vec<MapSummary>>, ApiError> {
    let maps = warehouse
        .list_maps()
        .await
        .map_err(|e| ApiError::from_warehouse(e, "list_maps", "Erro ao listar mapas"))?;
    Ok(Json(maps))
}

/// `POST /mapas/search`
///
/// A search without matches answers 404 with the term echoed back instead of
/// the usual error body.
pub async fn search_maps(
    State(warehouse): State<Warehouse>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let term = request.term.unwrap_or_default();

    match warehouse.search_maps(&term).await {
        Ok(search) => Ok(Json(SearchResponse::from(search)).into_response()),
        Err(Error::Map(MapError::NoMatches { term })) => {
            tracing::debug!(term = %term, "Search matched nothing");
            let body = SearchMissResponse {
                message: MSG_NO_MATCHES.to_string(),
                term,
            };
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        }
        Err(e) => Err(ApiError::from_warehouse(
            e,
            "search_maps",
            "Erro ao pesquisar mapas",
        )),
    }
}

/// `DELETE /mapas/{map_id}`
pub async fn delete_map(
    State(warehouse): State<Warehouse>,
    Path(map_id): Path<String>,
) -> Result<Json<DeleteMapResponse>, ApiError> {
    let deleted = warehouse
        .delete_map_by_raw_id(&map_id)
        .await
        .map_err(|e| ApiError::from_warehouse(e, "delete_map", "Erro ao deletar mapa"))?;
    Ok(Json(deleted.into()))
}
