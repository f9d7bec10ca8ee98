//! API route definitions

use super::handlers;
use super::node_handlers;
use super::relationship_handlers;
use crate::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        .route("/documentation", get(handlers::documentation))
        // ====================================================================
        // Nodes
        // ====================================================================
        .route("/nodes", post(node_handlers::create_node))
        .route(
            "/nodes/{id}",
            get(node_handlers::get_node)
                .put(node_handlers::update_node)
                .delete(node_handlers::delete_node),
        )
        .route("/search", get(node_handlers::search))
        // ====================================================================
        // Relationships
        // ====================================================================
        .route(
            "/nodes/{id}/relationships",
            get(relationship_handlers::list_relationships)
                .post(relationship_handlers::create_relationship),
        )
        .route(
            "/relationships/{id}",
            delete(relationship_handlers::delete_relationship),
        )
        // Maintenance
        .route("/delete_all", delete(handlers::delete_all))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
