//! Neo4j client for the claim graph

use super::error::GraphError;
use super::mapper;
use super::models::*;
use super::search::{ParamValue, SearchQuery};
use anyhow::Context;
use neo4rs::{query, BoltNull, BoltType, Graph, Query, Row};
use std::sync::Arc;

/// Client for Neo4j operations.
///
/// Wraps the driver's connection pool; every method checks out one
/// connection for a single statement.
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

/// Render `{field: $field, ...}` for the given node fields
fn property_map(fields: &[NodeField]) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|field| match field {
            NodeField::CreatedAt => format!("{0}: datetime(${0})", field.as_str()),
            _ => format!("{0}: ${0}", field.as_str()),
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Bind an optional value, sending null when absent
fn nullable<T: Into<BoltType>>(value: Option<T>) -> BoltType {
    value.map(Into::into).unwrap_or(BoltType::Null(BoltNull))
}

/// Bind every field of a node payload
fn bind_node(q: Query, node: &NewNode) -> Query {
    let mut q = q
        .param("document", node.document.clone())
        .param("keywords", node.keywords.clone())
        .param("created_at", node.created_at.to_rfc3339());
    if let Some(source) = &node.source {
        q = q.param("source", source.clone());
    }
    for metric in Metric::ALL {
        if let Some(value) = node.metric(metric) {
            q = q.param(metric.as_str(), value);
        }
    }
    if let Some(node_type) = &node.node_type {
        q = q.param("type", node_type.clone());
    }
    // `SET n += {p: null}` removes the property
    for field in &node.cleared {
        q = q.param(field.as_str(), BoltType::Null(BoltNull));
    }
    q
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> anyhow::Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        tracing::info!(uri = %uri, "Connected to Neo4j");

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    /// Execute a parameterized Cypher query and collect its rows
    async fn execute_with_params(&self, q: Query) -> Result<Vec<Row>, GraphError> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query expected to yield at most one row
    async fn fetch_one(&self, q: Query) -> Result<Option<Row>, GraphError> {
        let mut result = self.graph.execute(q).await?;
        Ok(result.next().await?)
    }

    /// Read `deleted_count` from a `RETURN count(..) AS deleted_count` row
    async fn fetch_count(&self, q: Query) -> Result<u64, GraphError> {
        let count = match self.fetch_one(q).await? {
            Some(row) => row.get::<i64>("deleted_count")?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    // ========================================================================
    // Node operations
    // ========================================================================

    /// Create a node and return its id
    pub async fn create_node(&self, node: &NewNode) -> Result<i64, GraphError> {
        let cypher = format!(
            "CREATE (n:Node {}) RETURN id(n) AS id",
            property_map(&node.fields())
        );
        let q = bind_node(query(&cypher), node);

        let row = self
            .fetch_one(q)
            .await?
            .context("CREATE returned no row")?;
        let id: i64 = row.get("id")?;
        tracing::debug!(node_id = id, "Created node");
        Ok(id)
    }

    /// Get a node by id
    pub async fn get_node(&self, id: i64) -> Result<Option<NodeRecord>, GraphError> {
        let q = query(
            r#"
            MATCH (n:Node)
            WHERE id(n) = $id
            RETURN n
            "#,
        )
        .param("id", id);

        match self.fetch_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = row.get("n")?;
                Ok(Some(mapper::node_record(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Merge properties into an existing node
    pub async fn update_node(
        &self,
        id: i64,
        node: &NewNode,
    ) -> Result<Option<NodeRecord>, GraphError> {
        let cypher = format!(
            "MATCH (n:Node) WHERE id(n) = $id SET n += {} RETURN n",
            property_map(&node.fields())
        );
        let q = bind_node(query(&cypher).param("id", id), node);

        match self.fetch_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = row.get("n")?;
                tracing::debug!(node_id = id, "Updated node");
                Ok(Some(mapper::node_record(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Delete a node and its relationships
    pub async fn delete_node(&self, id: i64) -> Result<u64, GraphError> {
        let q = query(
            r#"
            MATCH (n:Node)
            WHERE id(n) = $id
            DETACH DELETE n
            RETURN count(n) AS deleted_count
            "#,
        )
        .param("id", id);

        self.fetch_count(q).await
    }

    /// Search nodes with a prebuilt predicate set
    pub async fn search_nodes(&self, search: &SearchQuery) -> Result<Vec<NodeHit>, GraphError> {
        let cypher = search.cypher();
        let mut q = query(&cypher);
        for (name, value) in search.params() {
            q = match value {
                ParamValue::Text(s) => q.param(name, s),
                ParamValue::List(list) => q.param(name, list),
                ParamValue::Float(f) => q.param(name, f),
            };
        }

        let rows = self.execute_with_params(q).await?;
        let mut hits = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("node")?;
            hits.push(NodeHit {
                node_id: row.get("node_id")?,
                node: mapper::node_record(&node)?,
            });
        }
        Ok(hits)
    }

    // ========================================================================
    // Relationship operations
    // ========================================================================

    /// Create or update the edge between two existing nodes
    pub async fn upsert_relationship(
        &self,
        source_id: i64,
        rel: &NewRelationship,
    ) -> Result<Option<i64>, GraphError> {
        let q = query(
            r#"
            MATCH (a:Node), (b:Node)
            WHERE id(a) = $id AND id(b) = $target_id
            MERGE (a)-[r:RELATED_TO]->(b)
            SET r.weight = $weight,
                r.accuracy = $accuracy,
                r.authenticity = $authenticity,
                r.confidence = $confidence,
                r.relevance = $relevance,
                r.credibility = $credibility,
                r.reasoning = $reasoning,
                r.created_at = datetime($created_at)
            RETURN id(r) AS relationship_id
            "#,
        )
        .param("id", source_id)
        .param("target_id", rel.target_id)
        .param("weight", nullable(rel.weight))
        .param("accuracy", nullable(rel.accuracy))
        .param("authenticity", nullable(rel.authenticity))
        .param("confidence", nullable(rel.confidence))
        .param("relevance", nullable(rel.relevance))
        .param("credibility", nullable(rel.credibility))
        .param("reasoning", nullable(rel.reasoning.clone()))
        .param("created_at", rel.created_at.to_rfc3339());

        match self.fetch_one(q).await? {
            Some(row) => {
                let rel_id: i64 = row.get("relationship_id")?;
                tracing::debug!(
                    relationship_id = rel_id,
                    source_id,
                    target_id = rel.target_id,
                    "Upserted relationship"
                );
                Ok(Some(rel_id))
            }
            None => Ok(None),
        }
    }

    /// List a node's outgoing relationships
    pub async fn list_relationships(
        &self,
        source_id: i64,
        order: RelationshipOrder,
    ) -> Result<Vec<RelationshipRecord>, GraphError> {
        let cypher = format!(
            r#"
            MATCH (n:Node)-[r]->(m)
            WHERE id(n) = $id
            RETURN id(r) AS relationship_id, id(m) AS node_id,
                   r.weight AS weight, r.accuracy AS accuracy,
                   r.authenticity AS authenticity, r.confidence AS confidence,
                   r.relevance AS relevance, r.credibility AS credibility,
                   r.reasoning AS reasoning, r.created_at AS created_at
            ORDER BY r.{} DESC
            "#,
            order.as_str()
        );
        let q = query(&cypher).param("id", source_id);

        let rows = self.execute_with_params(q).await?;
        rows.iter()
            .map(|row| mapper::relationship_record(row).map_err(GraphError::from))
            .collect()
    }

    /// Delete a relationship by id
    pub async fn delete_relationship(&self, id: i64) -> Result<u64, GraphError> {
        let q = query(
            r#"
            MATCH ()-[r]->()
            WHERE id(r) = $id
            DELETE r
            RETURN count(r) AS deleted_count
            "#,
        )
        .param("id", id);

        self.fetch_count(q).await
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Delete every node and relationship
    pub async fn delete_all(&self) -> Result<(), GraphError> {
        self.graph.run(query("MATCH (n) DETACH DELETE n")).await?;
        tracing::info!("Deleted all nodes and relationships");
        Ok(())
    }

    /// Check connectivity
    pub async fn health_check(&self) -> Result<bool, GraphError> {
        let row = self.fetch_one(query("RETURN 1 AS ok")).await?;
        Ok(row.is_some())
    }
}
