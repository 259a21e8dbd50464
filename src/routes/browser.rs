//! Browser session endpoints
//!
//! - `GET /` snapshot of the session
//! - `POST /commands` run a [`BrowserCommand`]
//! - `GET /frame` last page drawn by the shell
//! - `GET /share` share links for the active resource
//! - `GET /open?resource=<id>` follow a share link

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::browser::{BrowserCommand, SessionSnapshot};
use crate::document::PageFrame;
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/commands", post(run_command))
        .route("/frame", get(get_frame))
        .route("/share", get(get_share))
        .route("/open", get(open_link))
}

async fn get_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.browser().snapshot().await)
}

/// Run a command and return the resulting snapshot
async fn run_command(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BrowserCommand>, JsonRejection>,
) -> Result<Json<SessionSnapshot>> {
    let Json(command) = payload?;
    state.browser().dispatch(command).await;
    Ok(Json(state.browser().snapshot().await))
}

#[derive(Deserialize)]
pub struct OpenQuery {
    pub resource: Option<String>,
}

/// Select the resource named by a share link's `resource` parameter.
/// Unknown ids leave the selection unchanged.
async fn open_link(
    State(state): State<AppState>,
    Query(query): Query<OpenQuery>,
) -> Result<Json<SessionSnapshot>> {
    let id = query
        .resource
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("resource is required".to_string()))?;
    state.browser().select_by_id(&id).await;
    Ok(Json(state.browser().snapshot().await))
}

async fn get_frame(State(state): State<AppState>) -> Result<Json<PageFrame>> {
    state
        .frame()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No page has been drawn".to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub link: String,
    pub facebook_url: String,
}

async fn get_share(State(state): State<AppState>) -> Result<Json<ShareResponse>> {
    let browser = state.browser();
    match (browser.share_link().await, browser.facebook_share_url().await) {
        (Some(link), Some(facebook_url)) => Ok(Json(ShareResponse { link, facebook_url })),
        _ => Err(AppError::NotFound("No resource is selected".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{get, json, send, test_app};

    #[tokio::test]
    async fn test_snapshot_after_init() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, get("/api/v1/browser")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["state"], "displaying");
        assert_eq!(body["state"]["resourceId"], "intro");
        assert_eq!(body["currentIndex"], 0);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["resources"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_commands() {
        let (app, _) = test_app().await;

        let request = json("POST", "/api/v1/browser/commands", json!({"command": "next_page"}));
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 2);

        let request = json(
            "POST",
            "/api/v1/browser/commands",
            json!({"command": "filter", "category": "design"}),
        );
        let (_, body) = send(&app, request).await;
        assert_eq!(body["state"]["state"], "error");
        assert_eq!(body["state"]["error"]["kind"], "empty_filter_result");

        let request = json("POST", "/api/v1/browser/commands", json!({"command": "fly"}));
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_open_share_link() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, get("/api/v1/browser/open?resource=walkthrough")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["resourceId"], "walkthrough");

        let (_, body) = send(&app, get("/api/v1/browser/open?resource=missing")).await;
        assert_eq!(body["state"]["resourceId"], "walkthrough");

        let (status, _) = send(&app, get("/api/v1/browser/open")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_frame_and_share() {
        let (app, state) = test_app().await;

        let mut frame = None;
        for _ in 0..50 {
            frame = state.frame().await;
            if frame.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(frame.map(|f| f.page_number), Some(1));

        let (status, body) = send(&app, get("/api/v1/browser/frame")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pageNumber"], 1);

        let (status, body) = send(&app, get("/api/v1/browser/share")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["link"].as_str().unwrap().ends_with("?resource=intro"));
    }
}
