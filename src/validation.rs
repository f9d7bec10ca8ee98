//! Request schemas and their validation
//!
//! Every endpoint that accepts input deserializes it into one of the raw
//! request structs below, whose fields are all optional, then calls
//! `validate()` to obtain a typed value or the list of offending fields.
//! Nothing reaches the graph until validation succeeds.

use crate::neo4j::models::{Metric, NewNode, NewRelationship, NodeField, RelationshipOrder};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const REQUIRED: &str = "Missing data for required field.";
const UNIT_RANGE: &str = "Must be greater than or equal to 0 and less than or equal to 1.";
const NOT_A_NUMBER: &str = "Not a valid number.";
const NOT_A_DATETIME: &str = "Not a valid datetime.";

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the offending fields
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Parse a timestamp given either as RFC 3339 or as a naive ISO-8601
/// datetime, which is taken to be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Tell `"field": null` (`Some(None)`) apart from an absent field (`None`)
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Unwrap an explicitly nullable field, recording an explicit null in `cleared`
fn take_present<T>(
    cleared: &mut Vec<NodeField>,
    field: NodeField,
    raw: Option<Option<T>>,
) -> Option<T> {
    match raw {
        Some(None) => {
            cleared.push(field);
            None
        }
        Some(value) => value,
        None => None,
    }
}

fn check_unit_range(errors: &mut ValidationErrors, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !(0.0..=1.0).contains(&v) {
            errors.add(field, UNIT_RANGE);
        }
    }
}

fn resolve_created_at(
    errors: &mut ValidationErrors,
    raw: Option<&str>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    match raw {
        None => now,
        Some(s) => parse_timestamp(s).unwrap_or_else(|| {
            errors.add("created_at", NOT_A_DATETIME);
            now
        }),
    }
}

// ============================================================================
// Node schema
// ============================================================================

/// Body of `POST /nodes` and `PUT /nodes/{id}`
///
/// The nullable properties keep an explicit `null` apart from an omitted
/// key: on update, `null` removes the property while omission leaves it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeRequest {
    pub document: Option<String>,
    pub keywords: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub credibility: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub accuracy: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub authenticity: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub confidence: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub relevance: Option<Option<f64>>,
    #[serde(rename = "type", default, deserialize_with = "deserialize_present")]
    pub node_type: Option<Option<String>>,
    pub created_at: Option<String>,
}

impl NodeRequest {
    /// Validate the payload; `now` becomes `created_at` when none was sent.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewNode, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.document.is_none() {
            errors.add("document", REQUIRED);
        }

        let mut cleared = Vec::new();
        let source = take_present(&mut cleared, NodeField::Source, self.source);
        let mut take_metric = |m: Metric, raw: Option<Option<f64>>| {
            take_present(&mut cleared, NodeField::Metric(m), raw)
        };
        let credibility = take_metric(Metric::Credibility, self.credibility);
        let accuracy = take_metric(Metric::Accuracy, self.accuracy);
        let authenticity = take_metric(Metric::Authenticity, self.authenticity);
        let confidence = take_metric(Metric::Confidence, self.confidence);
        let relevance = take_metric(Metric::Relevance, self.relevance);
        let node_type = take_present(&mut cleared, NodeField::Type, self.node_type);

        for (metric, value) in [
            (Metric::Credibility, credibility),
            (Metric::Accuracy, accuracy),
            (Metric::Authenticity, authenticity),
            (Metric::Confidence, confidence),
            (Metric::Relevance, relevance),
        ] {
            check_unit_range(&mut errors, metric.as_str(), value);
        }
        let created_at = resolve_created_at(&mut errors, self.created_at.as_deref(), now);

        errors.finish(|| NewNode {
            document: self.document.unwrap_or_default(),
            keywords: self.keywords.unwrap_or_default(),
            source,
            credibility,
            accuracy,
            authenticity,
            confidence,
            relevance,
            node_type,
            created_at,
            cleared,
        })
    }
}

// ============================================================================
// Relationship schema
// ============================================================================

/// Body of `POST /nodes/{id}/relationships`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipRequest {
    pub target_id: Option<i64>,
    pub weight: Option<f64>,
    pub accuracy: Option<f64>,
    pub authenticity: Option<f64>,
    pub confidence: Option<f64>,
    pub relevance: Option<f64>,
    pub credibility: Option<f64>,
    pub reasoning: Option<String>,
    pub created_at: Option<String>,
}

impl RelationshipRequest {
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewRelationship, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.target_id.is_none() {
            errors.add("target_id", REQUIRED);
        }
        for (order, value) in [
            (RelationshipOrder::Weight, self.weight),
            (RelationshipOrder::Accuracy, self.accuracy),
            (RelationshipOrder::Authenticity, self.authenticity),
            (RelationshipOrder::Confidence, self.confidence),
            (RelationshipOrder::Relevance, self.relevance),
            (RelationshipOrder::Credibility, self.credibility),
        ] {
            check_unit_range(&mut errors, order.as_str(), value);
        }
        let created_at = resolve_created_at(&mut errors, self.created_at.as_deref(), now);

        errors.finish(|| NewRelationship {
            target_id: self.target_id.unwrap_or_default(),
            weight: self.weight,
            accuracy: self.accuracy,
            authenticity: self.authenticity,
            confidence: self.confidence,
            relevance: self.relevance,
            credibility: self.credibility,
            reasoning: self.reasoning,
            created_at,
        })
    }
}

// ============================================================================
// Search schema
// ============================================================================

/// Query string of `GET /search`. Empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub keywords: Option<String>,
    pub min_credibility: Option<String>,
    pub min_accuracy: Option<String>,
    pub min_authenticity: Option<String>,
    pub min_confidence: Option<String>,
    pub min_relevance: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub regex: Option<String>,
}

/// Validated search filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub query: Option<String>,
    /// Raw comma-separated keyword list
    pub keywords: Option<String>,
    /// Lower bounds, one slot per metric in [`Metric::ALL`] order
    pub minimums: Vec<(Metric, f64)>,
    pub node_type: Option<String>,
    pub regex: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl SearchParams {
    fn raw_minimum(&self, metric: Metric) -> Option<&str> {
        let raw = match metric {
            Metric::Credibility => &self.min_credibility,
            Metric::Accuracy => &self.min_accuracy,
            Metric::Authenticity => &self.min_authenticity,
            Metric::Confidence => &self.min_confidence,
            Metric::Relevance => &self.min_relevance,
        };
        raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn validate(self) -> Result<SearchFilters, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut minimums = Vec::new();

        for metric in Metric::ALL {
            let Some(raw) = self.raw_minimum(metric) else {
                continue;
            };
            match raw.parse::<f64>() {
                Ok(v) if (0.0..=1.0).contains(&v) => minimums.push((metric, v)),
                Ok(_) => errors.add(metric.min_param(), UNIT_RANGE),
                Err(_) => errors.add(metric.min_param(), NOT_A_NUMBER),
            }
        }

        errors.finish(|| SearchFilters {
            query: non_empty(self.query),
            keywords: non_empty(self.keywords),
            minimums,
            node_type: non_empty(self.node_type),
            regex: non_empty(self.regex),
        })
    }
}

// ============================================================================
// Relationship-listing schema
// ============================================================================

/// Query string of `GET /nodes/{id}/relationships`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipListParams {
    pub order_by: Option<String>,
}

impl RelationshipListParams {
    pub fn validate(self) -> Result<RelationshipOrder, ValidationErrors> {
        let Some(raw) = self.order_by.filter(|s| !s.is_empty()) else {
            return Ok(RelationshipOrder::default());
        };
        RelationshipOrder::parse(&raw).ok_or_else(|| {
            let allowed: Vec<&str> = RelationshipOrder::ALL.iter().map(|o| o.as_str()).collect();
            let mut errors = ValidationErrors::new();
            errors.add("order_by", format!("Must be one of: {}.", allowed.join(", ")));
            errors
        })
    }
}
