//! GraphStore trait definition
//!
//! Defines the abstract interface for all graph operations the HTTP layer
//! needs. `Neo4jClient` implements it against a live database and the test
//! mock implements it in memory.

use super::error::GraphError;
use super::models::*;
use super::search::SearchQuery;
use async_trait::async_trait;

/// Abstract interface for all graph database operations.
///
/// Each method maps to exactly one Cypher statement.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Node operations
    // ========================================================================

    /// Create a node and return its store-assigned id
    async fn create_node(&self, node: &NewNode) -> Result<i64, GraphError>;

    /// Get a node by id
    async fn get_node(&self, id: i64) -> Result<Option<NodeRecord>, GraphError>;

    /// Merge the given properties into an existing node.
    /// Returns `None` when no node has this id.
    async fn update_node(&self, id: i64, node: &NewNode)
        -> Result<Option<NodeRecord>, GraphError>;

    /// Delete a node (and its relationships), returning how many were deleted
    async fn delete_node(&self, id: i64) -> Result<u64, GraphError>;

    /// Run a search, ordered by weight descending
    async fn search_nodes(&self, search: &SearchQuery) -> Result<Vec<NodeHit>, GraphError>;

    // ========================================================================
    // Relationship operations
    // ========================================================================

    /// Create or update the `RELATED_TO` edge from `source_id` to
    /// `rel.target_id`. Returns `None` if either endpoint does not exist.
    async fn upsert_relationship(
        &self,
        source_id: i64,
        rel: &NewRelationship,
    ) -> Result<Option<i64>, GraphError>;

    /// List outgoing relationships of a node, sorted descending by `order`
    async fn list_relationships(
        &self,
        source_id: i64,
        order: RelationshipOrder,
    ) -> Result<Vec<RelationshipRecord>, GraphError>;

    /// Delete a relationship, returning how many were deleted
    async fn delete_relationship(&self, id: i64) -> Result<u64, GraphError>;

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Delete every node and relationship
    async fn delete_all(&self) -> Result<(), GraphError>;

    /// Check connectivity
    async fn health_check(&self) -> Result<bool, GraphError>;
}
