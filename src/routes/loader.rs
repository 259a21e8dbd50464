//! Document loader endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::loader::LoaderStats;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/cache", delete(clear_cache))
        .route("/probe", get(probe))
        .route("/primary-first", put(set_primary_first))
}

async fn get_stats(State(state): State<AppState>) -> Json<LoaderStats> {
    Json(state.loader().stats().await)
}

async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.loader().clear_cache().await;
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct ProbeQuery {
    #[serde(default)]
    pub uri: String,
}

#[derive(Serialize)]
pub struct ProbeResponse {
    pub uri: String,
    pub available: bool,
}

async fn probe(
    State(state): State<AppState>,
    Query(query): Query<ProbeQuery>,
) -> Result<Json<ProbeResponse>> {
    if query.uri.trim().is_empty() {
        return Err(AppError::BadRequest("uri is required".to_string()));
    }
    let available = state.loader().check_available(&query.uri).await;
    Ok(Json(ProbeResponse {
        uri: query.uri,
        available,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrimaryFirst {
    pub enabled: bool,
}

async fn set_primary_first(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PrimaryFirst>, JsonRejection>,
) -> Result<Json<PrimaryFirst>> {
    let Json(body) = payload?;
    state.loader().set_primary_first(body.enabled);
    Ok(Json(PrimaryFirst {
        enabled: state.loader().primary_first(),
    }))
}
