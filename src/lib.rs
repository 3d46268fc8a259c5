pub mod auth;
pub mod bandit;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SchedulerConfig;
use crate::services::transcribe::Transcriber;
use crate::state::AppState;
use crate::store::ArmStore;

/// Builds the full application router from the environment. Without a
/// `DATABASE_URL` the arm store runs in process memory, which is what the
/// integration tests use.
pub async fn create_app() -> axum::Router {
    let store = match std::env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
    {
        Some(url) => match ArmStore::connect(&url).await {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "database unavailable, using in-memory arm store");
                ArmStore::in_memory()
            }
        },
        None => ArmStore::in_memory(),
    };

    let state = AppState::new(
        Arc::new(store),
        SchedulerConfig::from_env(),
        Transcriber::from_env(),
    );

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
