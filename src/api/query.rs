//! Query and collection endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::domain::query::{AnswerOrigin, QueryAnswer};

/// Request body for POST /v1/query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    pub collection_id: String,
}

/// Response body for POST /v1/query
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub source: AnswerOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl From<QueryAnswer> for QueryResponse {
    fn from(answer: QueryAnswer) -> Self {
        Self {
            response: answer.text,
            source: answer.origin,
            similarity: answer.similarity,
            sources: answer.sources,
        }
    }
}

/// Response body for DELETE /v1/collections/{collection_id}
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCollectionResponse {
    pub collection_id: String,
    pub cleared_entries: usize,
}

/// POST /v1/query
pub async fn answer_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }

    if request.collection_id.trim().is_empty() {
        return Err(ApiError::bad_request("collectionId must not be empty"));
    }

    info!(collection_id = %request.collection_id, "Processing query");

    let answer = state
        .query_service
        .answer(&request.query, &request.collection_id)
        .await?;

    info!(source = ?answer.origin, "Query answered");

    Ok((StatusCode::OK, Json(QueryResponse::from(answer))))
}

/// DELETE /v1/collections/{collection_id}
pub async fn clear_collection(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cleared_entries = state.query_service.clear_collection(&collection_id).await?;

    Ok((
        StatusCode::OK,
        Json(ClearCollectionResponse {
            collection_id,
            cleared_entries,
        }),
    ))
}
