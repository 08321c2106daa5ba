use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::chatbot::LocalConnectChatbot;
use crate::models::{CURRENT_LOCATION, Query};

pub type AppState = Arc<LocalConnectChatbot>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}

impl ApiError {
    fn bad_request(detail: &str) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(Self {
                detail: detail.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(chatbot: AppState) -> Router {
    Router::new()
        .route("/query/", post(handle_query))
        .with_state(chatbot)
}

async fn handle_query(State(chatbot): State<AppState>, Json(payload): Json<ApiQuery>) -> Response {
    let Some(query) = payload.query.filter(|q| !q.trim().is_empty()) else {
        return ApiError::bad_request("Query cannot be empty.");
    };

    let query = Query::new(query, payload.location);
    tracing::info!(
        "Received query: '{}' with location: '{}'",
        query.text,
        query.location_hint.as_deref().unwrap_or(CURRENT_LOCATION)
    );

    let response = chatbot.handle(&query).await;
    Json(ApiResponse { response }).into_response()
}
