//! HTTP API for the claim graph

pub mod handlers;
pub mod node_handlers;
pub mod relationship_handlers;
pub mod routes;

pub use handlers::AppError;
pub use routes::create_router;
