//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::error::GraphError;
use super::models::*;
use super::search::SearchQuery;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    // ========================================================================
    // Node operations
    // ========================================================================

    async fn create_node(&self, node: &NewNode) -> Result<i64, GraphError> {
        self.create_node(node).await
    }

    async fn get_node(&self, id: i64) -> Result<Option<NodeRecord>, GraphError> {
        self.get_node(id).await
    }

    async fn update_node(
        &self,
        id: i64,
        node: &NewNode,
    ) -> Result<Option<NodeRecord>, GraphError> {
        self.update_node(id, node).await
    }

    async fn delete_node(&self, id: i64) -> Result<u64, GraphError> {
        self.delete_node(id).await
    }

    async fn search_nodes(&self, search: &SearchQuery) -> Result<Vec<NodeHit>, GraphError> {
        self.search_nodes(search).await
    }

    // ========================================================================
    // Relationship operations
    // ========================================================================

    async fn upsert_relationship(
        &self,
        source_id: i64,
        rel: &NewRelationship,
    ) -> Result<Option<i64>, GraphError> {
        self.upsert_relationship(source_id, rel).await
    }

    async fn list_relationships(
        &self,
        source_id: i64,
        order: RelationshipOrder,
    ) -> Result<Vec<RelationshipRecord>, GraphError> {
        self.list_relationships(source_id, order).await
    }

    async fn delete_relationship(&self, id: i64) -> Result<u64, GraphError> {
        self.delete_relationship(id).await
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    async fn delete_all(&self) -> Result<(), GraphError> {
        self.delete_all().await
    }

    async fn health_check(&self) -> Result<bool, GraphError> {
        self.health_check().await
    }
}
