use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use lexiease_backend_rust::config::{Config, SchedulerConfig};
use lexiease_backend_rust::logging;
use lexiease_backend_rust::routes;
use lexiease_backend_rust::services::transcribe::Transcriber;
use lexiease_backend_rust::state::AppState;
use lexiease_backend_rust::store::ArmStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

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
        None => {
            tracing::warn!("DATABASE_URL not set, arm statistics will not survive a restart");
            ArmStore::in_memory()
        }
    };

    let transcriber = Transcriber::from_env();
    if !transcriber.is_available() {
        tracing::warn!(
            "GEMINI_API_KEY not set; attempts must carry a transcript instead of audio"
        );
    }

    let state = AppState::new(Arc::new(store), SchedulerConfig::from_env(), transcriber);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!(%addr, "lexiease backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
