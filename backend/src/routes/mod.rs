//! Route definitions for the Farm Grid Management API

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Farm, zone and tree management
        .nest("/farms", farm_routes())
}

/// Farm routes
fn farm_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_farms).post(handlers::create_farm))
        .route(
            "/:farm_id",
            get(handlers::get_farm)
                .put(handlers::update_farm)
                .delete(handlers::delete_farm),
        )
        .route("/:farm_id/capacity", get(handlers::get_farm_capacity))
        .nest("/:farm_id/zones", zone_routes())
}

/// Zone routes, nested under a farm
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_zones).post(handlers::create_zone))
        .route("/admission", post(handlers::preview_admission))
        .route(
            "/:zone_id",
            get(handlers::get_zone).delete(handlers::delete_zone),
        )
        .route("/:zone_id/grid", get(handlers::get_zone_grid))
        .nest("/:zone_id/trees", tree_routes())
}

/// Tree routes, nested under a zone
fn tree_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_trees).post(handlers::create_trees))
        .route("/bulk", post(handlers::place_trees_bulk))
        .route("/:tree_id", delete(handlers::delete_tree))
}
