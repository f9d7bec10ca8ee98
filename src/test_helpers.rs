//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building mock AppState instances and driving the router.
#![allow(dead_code)]

use crate::neo4j::mock::MockGraphStore;
use crate::neo4j::models::*;
use crate::{AppState, Config};
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use chrono::Utc;
use std::sync::Arc;

// ============================================================================
// Mock state builders
// ============================================================================

fn mock_config() -> Config {
    Config {
        neo4j_uri: "bolt://mock:7687".to_string(),
        neo4j_user: "neo4j".to_string(),
        neo4j_password: "mock".to_string(),
        server_port: 0,
        service_name: "claim-graph-test".to_string(),
        service_description: "Mock claim graph".to_string(),
    }
}

/// Create a mock AppState with an empty in-memory graph
pub fn mock_app_state() -> AppState {
    mock_app_state_with(MockGraphStore::new())
}

/// Create a mock AppState around a pre-seeded graph
pub fn mock_app_state_with(graph: MockGraphStore) -> AppState {
    AppState {
        neo4j: Arc::new(graph),
        config: Arc::new(mock_config()),
    }
}

// ============================================================================
// Request / response helpers
// ============================================================================

/// Build a request with a JSON body
pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Entity factories
// ============================================================================

/// A node with only a document set
pub fn test_node(document: &str) -> NewNode {
    NewNode {
        document: document.to_string(),
        keywords: Vec::new(),
        source: None,
        credibility: None,
        accuracy: None,
        authenticity: None,
        confidence: None,
        relevance: None,
        node_type: None,
        created_at: Utc::now(),
        cleared: Vec::new(),
    }
}

/// A relationship to `target_id` with only a weight set
pub fn test_relationship(target_id: i64, weight: Option<f64>) -> NewRelationship {
    NewRelationship {
        target_id,
        weight,
        accuracy: None,
        authenticity: None,
        confidence: None,
        relevance: None,
        credibility: None,
        reasoning: None,
        created_at: Utc::now(),
    }
}
