use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use localconnect::{LocalConnectChatbot, LocalConnectConfig, VERSION, logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        LocalConnectConfig::load_from_path(config_path).context("Failed to load configuration")?;

    logging::init(&config.logging)?;
    tracing::info!("Starting LocalConnect AI {}", VERSION);

    let chatbot = Arc::new(LocalConnectChatbot::from_config(&config));
    web::run(&config.server, chatbot).await
}
