//! beer-service 入口

use beer_service::api::{self, AppState};
use taproom_bootstrap::run_http;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_http("config", |infra| async move {
        info!("Initializing beer-service...");

        let state = AppState::from_infrastructure(&infra).await?;
        info!(auth_enabled = state.auth.is_some(), "Stores initialized");

        Ok(api::router(state))
    })
    .await
}
