//! Node CRUD and search handlers

use super::handlers::{AppError, MessageResponse};
use crate::neo4j::models::{NodeHit, NodeRecord};
use crate::neo4j::SearchQuery;
use crate::validation::{NodeRequest, SearchParams};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;

const NODE_NOT_FOUND: &str = "Node not found";

#[derive(Debug, Serialize)]
pub struct CreateNodeResponse {
    pub id: i64,
}

/// POST /nodes
pub async fn create_node(
    State(state): State<AppState>,
    payload: Result<Json<NodeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateNodeResponse>), AppError> {
    let Json(req) = payload?;
    let node = req.validate(Utc::now())?;

    let id = state.neo4j.create_node(&node).await?;
    tracing::info!(node_id = id, "Node created");

    Ok((StatusCode::CREATED, Json(CreateNodeResponse { id })))
}

/// GET /nodes/{id}
pub async fn get_node(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<NodeRecord>, AppError> {
    let Path(id) = path?;
    let node = state
        .neo4j
        .get_node(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NODE_NOT_FOUND.into()))?;
    Ok(Json(node))
}

/// PUT /nodes/{id}
pub async fn update_node(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NodeRequest>, JsonRejection>,
) -> Result<Json<NodeRecord>, AppError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let node = req.validate(Utc::now())?;

    let updated = state
        .neo4j
        .update_node(id, &node)
        .await?
        .ok_or_else(|| AppError::NotFound(NODE_NOT_FOUND.into()))?;
    tracing::info!(node_id = id, "Node updated");

    Ok(Json(updated))
}

/// DELETE /nodes/{id}
pub async fn delete_node(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let deleted = state.neo4j.delete_node(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(NODE_NOT_FOUND.into()));
    }
    tracing::info!(node_id = id, "Node deleted");

    Ok(MessageResponse::new(format!(
        "Node '{}' successfully deleted",
        id
    )))
}

/// GET /search
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<NodeHit>>, AppError> {
    let Query(params) = query?;
    let filters = params.validate()?;
    let search = SearchQuery::build(&filters)?;

    tracing::debug!(where_clause = %search.where_clause(), "Searching nodes");
    let hits = state.neo4j.search_nodes(&search).await?;
    Ok(Json(hits))
}
