//! Conversion of Neo4j rows and nodes into API records

use super::models::{NewNode, NodeRecord, RelationshipRecord};
use crate::validation::parse_timestamp;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;

/// Render a timestamp in the canonical API form, e.g. `2024-03-01T12:00:00.000000Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Anything properties can be read from by key
trait Properties {
    fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
}

impl Properties for neo4rs::Node {
    fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).ok()
    }
}

impl Properties for neo4rs::Row {
    fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).ok()
    }
}

/// Read a timestamp stored as a zoned datetime, a local datetime (written by
/// older clients) or a string.
fn read_timestamp(props: &impl Properties, key: &str) -> Option<String> {
    let ts = props
        .value::<DateTime<FixedOffset>>(key)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| props.value::<NaiveDateTime>(key).map(|n| n.and_utc()))
        .or_else(|| {
            props
                .value::<String>(key)
                .and_then(|s| parse_timestamp(&s))
        })?;
    Some(format_timestamp(&ts))
}

/// Convert a `Node` to its API record
pub fn node_record(node: &neo4rs::Node) -> Result<NodeRecord> {
    Ok(NodeRecord {
        document: node
            .get("document")
            .context("Node is missing its document property")?,
        keywords: node.value("keywords").unwrap_or_default(),
        source: node.value("source"),
        credibility: node.value("credibility"),
        accuracy: node.value("accuracy"),
        authenticity: node.value("authenticity"),
        confidence: node.value("confidence"),
        relevance: node.value("relevance"),
        node_type: node.value("type"),
        created_at: read_timestamp(node, "created_at"),
    })
}

/// Convert a relationship listing row. Every column is read explicitly so
/// missing properties come back as nulls.
pub fn relationship_record(row: &neo4rs::Row) -> Result<RelationshipRecord> {
    Ok(RelationshipRecord {
        relationship_id: row.get("relationship_id")?,
        node_id: row.get("node_id")?,
        weight: row.value("weight"),
        accuracy: row.value("accuracy"),
        authenticity: row.value("authenticity"),
        confidence: row.value("confidence"),
        relevance: row.value("relevance"),
        credibility: row.value("credibility"),
        reasoning: row.value("reasoning"),
        created_at: read_timestamp(row, "created_at"),
    })
}

impl From<&NewNode> for NodeRecord {
    fn from(node: &NewNode) -> Self {
        NodeRecord {
            document: node.document.clone(),
            keywords: node.keywords.clone(),
            source: node.source.clone(),
            credibility: node.credibility,
            accuracy: node.accuracy,
            authenticity: node.authenticity,
            confidence: node.confidence,
            relevance: node.relevance,
            node_type: node.node_type.clone(),
            created_at: Some(format_timestamp(&node.created_at)),
        }
    }
}
