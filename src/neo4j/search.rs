//! Cypher predicate assembly for node search
//!
//! Turns validated [`SearchFilters`] into an ordered list of [`Predicate`]s.
//! Each predicate renders one `WHERE` fragment over the node alias `n` and
//! binds exactly one parameter; values never appear in the query text.

use super::models::Metric;
use crate::validation::SearchFilters;
use std::collections::BTreeMap;

/// Returned when a search request carries no filter at all
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "At least one of the following arguments must be provided 'query', 'keywords', 'regex', or 'min_credibility'"
)]
pub struct EmptySearchError;

/// A bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Float(f64),
}

/// One clause of a search filter
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Substring containment on `document`
    DocumentContains(String),
    /// At least one keyword in common with the given set
    KeywordsAny(Vec<String>),
    /// Inclusive lower bound on a metric
    AtLeast(Metric, f64),
    /// Exact match on `type`
    TypeEquals(String),
    /// Full-match regular expression on `document`, evaluated by the store
    DocumentMatches(String),
}

impl Predicate {
    pub fn param_name(&self) -> &'static str {
        match self {
            Predicate::DocumentContains(_) => "query",
            Predicate::KeywordsAny(_) => "keywords",
            Predicate::AtLeast(metric, _) => metric.min_param(),
            Predicate::TypeEquals(_) => "type",
            Predicate::DocumentMatches(_) => "regex",
        }
    }

    pub fn param_value(&self) -> ParamValue {
        match self {
            Predicate::DocumentContains(s)
            | Predicate::TypeEquals(s)
            | Predicate::DocumentMatches(s) => ParamValue::Text(s.clone()),
            Predicate::KeywordsAny(keywords) => ParamValue::List(keywords.clone()),
            Predicate::AtLeast(_, v) => ParamValue::Float(*v),
        }
    }

    /// Cypher fragment for this predicate
    pub fn fragment(&self) -> String {
        match self {
            Predicate::DocumentContains(_) => "(n.document CONTAINS $query)".to_string(),
            Predicate::KeywordsAny(_) => {
                "any(keyword IN n.keywords WHERE keyword IN $keywords)".to_string()
            }
            Predicate::AtLeast(metric, _) => {
                format!("n.{} >= ${}", metric.as_str(), metric.min_param())
            }
            Predicate::TypeEquals(_) => "n.type = $type".to_string(),
            Predicate::DocumentMatches(_) => "(n.document =~ $regex)".to_string(),
        }
    }
}

/// Split a comma-separated keyword list, dropping blank entries
pub fn split_keywords(raw: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        if !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}

/// A non-empty conjunction of search predicates
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    predicates: Vec<Predicate>,
}

impl SearchQuery {
    /// Build predicates in fixed precedence order: free text, keywords,
    /// metric minimums, type, regex.
    pub fn build(filters: &SearchFilters) -> Result<Self, EmptySearchError> {
        let mut predicates = Vec::new();

        if let Some(text) = &filters.query {
            predicates.push(Predicate::DocumentContains(text.clone()));
        }
        if let Some(raw) = &filters.keywords {
            let keywords = split_keywords(raw);
            if !keywords.is_empty() {
                predicates.push(Predicate::KeywordsAny(keywords));
            }
        }
        for metric in Metric::ALL {
            if let Some((_, min)) = filters.minimums.iter().find(|(m, _)| *m == metric) {
                predicates.push(Predicate::AtLeast(metric, *min));
            }
        }
        if let Some(node_type) = &filters.node_type {
            predicates.push(Predicate::TypeEquals(node_type.clone()));
        }
        if let Some(pattern) = &filters.regex {
            predicates.push(Predicate::DocumentMatches(pattern.clone()));
        }

        if predicates.is_empty() {
            return Err(EmptySearchError);
        }
        Ok(Self { predicates })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Fragments in precedence order
    pub fn fragments(&self) -> Vec<String> {
        self.predicates.iter().map(Predicate::fragment).collect()
    }

    /// The predicates joined with `AND`, without the `WHERE` keyword
    pub fn where_clause(&self) -> String {
        self.fragments().join(" AND ")
    }

    pub fn params(&self) -> BTreeMap<&'static str, ParamValue> {
        self.predicates
            .iter()
            .map(|p| (p.param_name(), p.param_value()))
            .collect()
    }

    /// Full search statement, ordered by weight descending
    pub fn cypher(&self) -> String {
        format!(
            "MATCH (n:Node)\nWHERE {}\nRETURN id(n) AS node_id, n AS node\nORDER BY n.weight DESC",
            self.where_clause()
        )
    }
}
