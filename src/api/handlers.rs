//! API request handlers shared across resources, and the error type

use crate::neo4j::{EmptySearchError, GraphError};
use crate::validation::ValidationErrors;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// Generic `{ "message": ... }` body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub neo4j: String,
}

/// Health check handler, verifying actual connectivity to Neo4j.
///
/// Returns 200 + `"ok"` when the store answers, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let neo4j_ok = state.neo4j.health_check().await.unwrap_or(false);

    let (http_status, status, neo4j) = if neo4j_ok {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            neo4j: neo4j.to_string(),
        }),
    )
}

// ============================================================================
// Documentation
// ============================================================================

/// Service metadata from configuration
#[derive(Debug, Serialize)]
pub struct DocumentationResponse {
    pub name: String,
    pub description: String,
}

pub async fn documentation(State(state): State<AppState>) -> Json<DocumentationResponse> {
    Json(DocumentationResponse {
        name: state.config.service_name.clone(),
        description: state.config.service_description.clone(),
    })
}

// ============================================================================
// Maintenance
// ============================================================================

/// Wipe every node and relationship
pub async fn delete_all(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    state.neo4j.delete_all().await?;
    Ok(MessageResponse::new(
        "All nodes and relationships deleted successfully",
    ))
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Validation(ValidationErrors),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::Value::String(e.to_string()),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::Value::String(msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::Value::String(msg))
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::to_value(&errors).unwrap_or_default(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Rejected { code, message } => {
                tracing::warn!(code = %code, "Neo4j rejected query: {}", message);
                AppError::BadRequest(message)
            }
            GraphError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<EmptySearchError> for AppError {
    fn from(err: EmptySearchError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
