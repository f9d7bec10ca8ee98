//! Neo4j client and models for the claim graph

pub mod client;
pub mod error;
mod impl_graph_store;
pub mod mapper;
pub mod models;
pub mod search;
pub mod traits;

pub use client::Neo4jClient;
pub use error::GraphError;
pub use models::*;
pub use search::{EmptySearchError, SearchQuery};
pub use traits::GraphStore;

#[cfg(test)]
pub(crate) mod mock;
