//! Relationship handlers

use super::handlers::{AppError, MessageResponse};
use crate::neo4j::models::RelationshipRecord;
use crate::validation::{RelationshipListParams, RelationshipRequest};
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

#[derive(Debug, Serialize)]
pub struct CreateRelationshipResponse {
    pub relationship_id: i64,
}

/// POST /nodes/{id}/relationships
///
/// Upserts the single `RELATED_TO` edge from `id` to `target_id`; every
/// property is overwritten, absent ones with null.
pub async fn create_relationship(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RelationshipRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateRelationshipResponse>), AppError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let rel = req.validate(Utc::now())?;

    let relationship_id = state
        .neo4j
        .upsert_relationship(id, &rel)
        .await?
        .ok_or_else(|| AppError::NotFound("Node not found".into()))?;
    tracing::info!(
        relationship_id,
        source_id = id,
        target_id = rel.target_id,
        "Relationship saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateRelationshipResponse { relationship_id }),
    ))
}

/// GET /nodes/{id}/relationships
pub async fn list_relationships(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<RelationshipListParams>, QueryRejection>,
) -> Result<Json<Vec<RelationshipRecord>>, AppError> {
    let Path(id) = path?;
    let Query(params) = query?;
    let order = params.validate()?;
    let relationships = state.neo4j.list_relationships(id, order).await?;
    Ok(Json(relationships))
}

/// DELETE /relationships/{id}
pub async fn delete_relationship(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let deleted = state.neo4j.delete_relationship(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Relationship not found".into()));
    }
    tracing::info!(relationship_id = id, "Relationship deleted");

    Ok(MessageResponse::new("Relationship deleted successfully"))
}
