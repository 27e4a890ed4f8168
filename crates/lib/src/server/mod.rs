//! HTTP API over a [`Warehouse`].
//!
//! | Method | Path              | Handler                  |
//! |--------|-------------------|--------------------------|
//! | GET    | `/`               | [`handlers::root`]       |
//! | GET    | `/health`         | [`handlers::health`]     |
//! | POST   | `/mapas/create`   | [`handlers::create_map`] |
//! | GET    | `/mapas/list`     | [`handlers::list_maps`]  |
//! | POST   | `/mapas/search`   | [`handlers::search_maps`]|
//! | DELETE | `/mapas/{map_id}` | [`handlers::delete_map`] |

pub mod error;
pub mod handlers;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{ApiError, ErrorBody, ErrorCode};

use crate::Warehouse;

/// Build the service router. Any origin may call it.
pub fn router(warehouse: Warehouse) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/mapas/create", post(handlers::create_map))
        .route("/mapas/list", get(handlers::list_maps))
        .route("/mapas/search", post(handlers::search_maps))
        .route("/mapas/{map_id}", delete(handlers::delete_map))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(warehouse)
}
