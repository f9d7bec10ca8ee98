//! Data models for claim nodes and their relationships

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scoring attributes shared by nodes and relationships.
///
/// The variant names are the only property names ever interpolated into
/// Cypher text alongside [`NodeField`] and [`RelationshipOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Credibility,
    Accuracy,
    Authenticity,
    Confidence,
    Relevance,
}

impl Metric {
    /// All node metrics, in search-filter precedence order
    pub const ALL: [Metric; 5] = [
        Metric::Credibility,
        Metric::Accuracy,
        Metric::Authenticity,
        Metric::Confidence,
        Metric::Relevance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Credibility => "credibility",
            Metric::Accuracy => "accuracy",
            Metric::Authenticity => "authenticity",
            Metric::Confidence => "confidence",
            Metric::Relevance => "relevance",
        }
    }

    /// Name of the search query parameter that sets a lower bound on this metric
    pub fn min_param(self) -> &'static str {
        match self {
            Metric::Credibility => "min_credibility",
            Metric::Accuracy => "min_accuracy",
            Metric::Authenticity => "min_authenticity",
            Metric::Confidence => "min_confidence",
            Metric::Relevance => "min_relevance",
        }
    }
}

/// Properties a `Node` may carry in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Document,
    Keywords,
    Source,
    Metric(Metric),
    Type,
    CreatedAt,
}

impl NodeField {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeField::Document => "document",
            NodeField::Keywords => "keywords",
            NodeField::Source => "source",
            NodeField::Metric(metric) => metric.as_str(),
            NodeField::Type => "type",
            NodeField::CreatedAt => "created_at",
        }
    }
}

/// Sortable relationship properties for relationship listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationshipOrder {
    #[default]
    Weight,
    Accuracy,
    Authenticity,
    Confidence,
    Relevance,
    Credibility,
}

impl RelationshipOrder {
    pub const ALL: [RelationshipOrder; 6] = [
        RelationshipOrder::Weight,
        RelationshipOrder::Accuracy,
        RelationshipOrder::Authenticity,
        RelationshipOrder::Confidence,
        RelationshipOrder::Relevance,
        RelationshipOrder::Credibility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipOrder::Weight => "weight",
            RelationshipOrder::Accuracy => "accuracy",
            RelationshipOrder::Authenticity => "authenticity",
            RelationshipOrder::Confidence => "confidence",
            RelationshipOrder::Relevance => "relevance",
            RelationshipOrder::Credibility => "credibility",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.as_str() == value)
    }
}

/// A validated node payload, ready to be written to the graph
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub document: String,
    pub keywords: Vec<String>,
    pub source: Option<String>,
    pub credibility: Option<f64>,
    pub accuracy: Option<f64>,
    pub authenticity: Option<f64>,
    pub confidence: Option<f64>,
    pub relevance: Option<f64>,
    pub node_type: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Optional properties sent as explicit nulls, to be removed on update
    pub cleared: Vec<NodeField>,
}

impl NewNode {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Credibility => self.credibility,
            Metric::Accuracy => self.accuracy,
            Metric::Authenticity => self.authenticity,
            Metric::Confidence => self.confidence,
            Metric::Relevance => self.relevance,
        }
    }

    fn has_value(&self, field: NodeField) -> bool {
        match field {
            NodeField::Source => self.source.is_some(),
            NodeField::Metric(metric) => self.metric(metric).is_some(),
            NodeField::Type => self.node_type.is_some(),
            NodeField::Document | NodeField::Keywords | NodeField::CreatedAt => true,
        }
    }

    /// Fields to write, in declaration order.
    ///
    /// `document`, `keywords` and `created_at` always carry a value (defaults
    /// are applied during validation). Optional fields are listed when set or
    /// explicitly cleared, so an update leaves omitted properties untouched.
    pub fn fields(&self) -> Vec<NodeField> {
        let optional = std::iter::once(NodeField::Source)
            .chain(Metric::ALL.into_iter().map(NodeField::Metric))
            .chain(std::iter::once(NodeField::Type));

        let mut fields = vec![NodeField::Document, NodeField::Keywords];
        fields.extend(optional.filter(|f| self.has_value(*f) || self.cleared.contains(f)));
        fields.push(NodeField::CreatedAt);
        fields
    }
}

/// A validated relationship payload. `target_id` is the edge's end node.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRelationship {
    pub target_id: i64,
    pub weight: Option<f64>,
    pub accuracy: Option<f64>,
    pub authenticity: Option<f64>,
    pub confidence: Option<f64>,
    pub relevance: Option<f64>,
    pub credibility: Option<f64>,
    pub reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A node as returned to API clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeRecord {
    pub document: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A search result: the node's properties flattened next to its id
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeHit {
    pub node_id: i64,
    #[serde(flatten)]
    pub node: NodeRecord,
}

/// An outgoing relationship as returned by relationship listings.
///
/// Every field is serialized, including nulls, so the shape does not depend
/// on which properties were set when the edge was written.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelationshipRecord {
    pub relationship_id: i64,
    pub node_id: i64,
    pub weight: Option<f64>,
    pub accuracy: Option<f64>,
    pub authenticity: Option<f64>,
    pub confidence: Option<f64>,
    pub relevance: Option<f64>,
    pub credibility: Option<f64>,
    pub reasoning: Option<String>,
    pub created_at: Option<String>,
}
