use std::sync::Arc;

use anyhow::Context;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::chatbot::LocalConnectChatbot;
use crate::config::ServerConfig;

/// Full application router: welcome route, query API and CORS
pub fn app(chatbot: Arc<LocalConnectChatbot>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(welcome))
        .nest("/api", api::router(chatbot))
        .layer(cors)
}

async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to LocalConnect AI API!" }))
}

pub async fn run(server: &ServerConfig, chatbot: Arc<LocalConnectChatbot>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app(chatbot))
        .await
        .context("Web server stopped unexpectedly")
}
