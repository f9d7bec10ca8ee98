//! In-memory mock implementation of GraphStore for testing.
//!
//! Mirrors the Cypher semantics the real client relies on: ids come from a
//! single counter, `SET n +=` merges, `MERGE` upserts on the ordered node
//! pair, comparisons against null are false and `DESC` sorts nulls first.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::error::GraphError;
use crate::neo4j::mapper::format_timestamp;
use crate::neo4j::models::*;
use crate::neo4j::search::{Predicate, SearchQuery};
use crate::neo4j::traits::GraphStore;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

/// A stored `RELATED_TO` edge
#[derive(Debug, Clone)]
pub struct StoredRelationship {
    pub source_id: i64,
    pub props: NewRelationship,
}

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    pub nodes: RwLock<BTreeMap<i64, NewNode>>,
    pub relationships: RwLock<BTreeMap<i64, StoredRelationship>>,
    next_id: AtomicI64,
    /// When set, every operation fails with a backend error
    pub offline: AtomicBool,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(BTreeMap::new()),
            relationships: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(0),
            offline: AtomicBool::new(false),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, AtomicOrdering::SeqCst)
    }

    fn check_online(&self) -> Result<(), GraphError> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(GraphError::Backend(anyhow::anyhow!(
                "Connection refused (mock store offline)"
            )));
        }
        Ok(())
    }
}

/// `SET n += {...}` with only the fields present in `update`; nulls remove
fn merge_node(existing: &mut NewNode, update: &NewNode) {
    existing.document = update.document.clone();
    existing.keywords = update.keywords.clone();
    existing.created_at = update.created_at;
    if update.source.is_some() {
        existing.source = update.source.clone();
    }
    if update.node_type.is_some() {
        existing.node_type = update.node_type.clone();
    }
    for metric in Metric::ALL {
        if let Some(value) = update.metric(metric) {
            match metric {
                Metric::Credibility => existing.credibility = Some(value),
                Metric::Accuracy => existing.accuracy = Some(value),
                Metric::Authenticity => existing.authenticity = Some(value),
                Metric::Confidence => existing.confidence = Some(value),
                Metric::Relevance => existing.relevance = Some(value),
            }
        }
    }
    for field in &update.cleared {
        match field {
            NodeField::Source => existing.source = None,
            NodeField::Type => existing.node_type = None,
            NodeField::Metric(Metric::Credibility) => existing.credibility = None,
            NodeField::Metric(Metric::Accuracy) => existing.accuracy = None,
            NodeField::Metric(Metric::Authenticity) => existing.authenticity = None,
            NodeField::Metric(Metric::Confidence) => existing.confidence = None,
            NodeField::Metric(Metric::Relevance) => existing.relevance = None,
            NodeField::Document | NodeField::Keywords | NodeField::CreatedAt => {}
        }
    }
}

/// Evaluate one predicate the way Cypher would
fn evaluate(predicate: &Predicate, node: &NewNode) -> Result<bool, GraphError> {
    Ok(match predicate {
        Predicate::DocumentContains(text) => node.document.contains(text.as_str()),
        Predicate::KeywordsAny(keywords) => node.keywords.iter().any(|k| keywords.contains(k)),
        Predicate::AtLeast(metric, min) => node.metric(*metric).is_some_and(|v| v >= *min),
        Predicate::TypeEquals(t) => node.node_type.as_deref() == Some(t.as_str()),
        Predicate::DocumentMatches(pattern) => {
            let re = regex::Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                GraphError::rejected(
                    "Neo.ClientError.Statement.ArgumentError",
                    format!("Invalid Regex: {}", e),
                )
            })?;
            re.is_match(&node.document)
        }
    })
}

/// The property a listing is sorted by
fn score(record: &RelationshipRecord, order: RelationshipOrder) -> Option<f64> {
    match order {
        RelationshipOrder::Weight => record.weight,
        RelationshipOrder::Accuracy => record.accuracy,
        RelationshipOrder::Authenticity => record.authenticity,
        RelationshipOrder::Confidence => record.confidence,
        RelationshipOrder::Relevance => record.relevance,
        RelationshipOrder::Credibility => record.credibility,
    }
}

/// Descending order with nulls first
fn desc_nulls_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
    }
}

fn relationship_record(id: i64, rel: &StoredRelationship) -> RelationshipRecord {
    let p = &rel.props;
    RelationshipRecord {
        relationship_id: id,
        node_id: p.target_id,
        weight: p.weight,
        accuracy: p.accuracy,
        authenticity: p.authenticity,
        confidence: p.confidence,
        relevance: p.relevance,
        credibility: p.credibility,
        reasoning: p.reasoning.clone(),
        created_at: Some(format_timestamp(&p.created_at)),
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn create_node(&self, node: &NewNode) -> Result<i64, GraphError> {
        self.check_online()?;
        let id = self.allocate_id();
        self.nodes.write().await.insert(id, node.clone());
        Ok(id)
    }

    async fn get_node(&self, id: i64) -> Result<Option<NodeRecord>, GraphError> {
        self.check_online()?;
        Ok(self.nodes.read().await.get(&id).map(NodeRecord::from))
    }

    async fn update_node(
        &self,
        id: i64,
        node: &NewNode,
    ) -> Result<Option<NodeRecord>, GraphError> {
        self.check_online()?;
        let mut nodes = self.nodes.write().await;
        Ok(nodes.get_mut(&id).map(|existing| {
            merge_node(existing, node);
            NodeRecord::from(&*existing)
        }))
    }

    async fn delete_node(&self, id: i64) -> Result<u64, GraphError> {
        self.check_online()?;
        let removed = self.nodes.write().await.remove(&id);
        if removed.is_none() {
            return Ok(0);
        }
        self.relationships
            .write()
            .await
            .retain(|_, r| r.source_id != id && r.props.target_id != id);
        Ok(1)
    }

    async fn search_nodes(&self, search: &SearchQuery) -> Result<Vec<NodeHit>, GraphError> {
        self.check_online()?;
        let nodes = self.nodes.read().await;
        let mut hits = Vec::new();
        for (id, node) in nodes.iter() {
            let mut keep = true;
            for predicate in search.predicates() {
                if !evaluate(predicate, node)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                hits.push(NodeHit {
                    node_id: *id,
                    node: NodeRecord::from(node),
                });
            }
        }
        // Nodes carry no weight property, so ORDER BY n.weight keeps store order
        Ok(hits)
    }

    async fn upsert_relationship(
        &self,
        source_id: i64,
        rel: &NewRelationship,
    ) -> Result<Option<i64>, GraphError> {
        self.check_online()?;
        {
            let nodes = self.nodes.read().await;
            if !nodes.contains_key(&source_id) || !nodes.contains_key(&rel.target_id) {
                return Ok(None);
            }
        }
        let mut rels = self.relationships.write().await;
        let existing = rels
            .iter()
            .find(|(_, r)| r.source_id == source_id && r.props.target_id == rel.target_id)
            .map(|(id, _)| *id);
        let id = existing.unwrap_or_else(|| self.allocate_id());
        rels.insert(
            id,
            StoredRelationship {
                source_id,
                props: rel.clone(),
            },
        );
        Ok(Some(id))
    }

    async fn list_relationships(
        &self,
        source_id: i64,
        order: RelationshipOrder,
    ) -> Result<Vec<RelationshipRecord>, GraphError> {
        self.check_online()?;
        let rels = self.relationships.read().await;
        let mut records: Vec<RelationshipRecord> = rels
            .iter()
            .filter(|(_, r)| r.source_id == source_id)
            .map(|(id, r)| relationship_record(*id, r))
            .collect();
        records.sort_by(|a, b| desc_nulls_first(score(a, order), score(b, order)));
        Ok(records)
    }

    async fn delete_relationship(&self, id: i64) -> Result<u64, GraphError> {
        self.check_online()?;
        let removed = self.relationships.write().await.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        self.check_online()?;
        self.relationships.write().await.clear();
        self.nodes.write().await.clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, GraphError> {
        Ok(!self.offline.load(AtomicOrdering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_nulls_first() {
        let mut values = vec![Some(0.2), None, Some(0.9), Some(0.5)];
        values.sort_by(|a, b| desc_nulls_first(*a, *b));
        assert_eq!(values, vec![None, Some(0.9), Some(0.5), Some(0.2)]);
    }

    #[test]
    fn test_regex_predicate_is_full_match() {
        let node = crate::test_helpers::test_node("the moon landing");
        let partial = Predicate::DocumentMatches("moon".into());
        let full = Predicate::DocumentMatches(".*moon.*".into());
        assert!(!evaluate(&partial, &node).unwrap());
        assert!(evaluate(&full, &node).unwrap());
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let node = crate::test_helpers::test_node("x");
        let err = evaluate(&Predicate::DocumentMatches("(".into()), &node).unwrap_err();
        assert!(matches!(err, GraphError::Rejected { .. }));
    }
}
