use crate::config::ServerConfig;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::Context;
use axum::extract::State;
use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct Stats {
    rooms: usize,
    connections: usize,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn stats(State(service): State<SignalingService>) -> Json<Stats> {
    Json(Stats {
        rooms: service.registry().room_count(),
        connections: service.connection_count(),
    })
}

/// WebSocket relay at `/ws`, health endpoints at `/health` and `/stats`, and everything
/// else served from `static_dir`.
pub fn app(service: SignalingService, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    let assets = ServeDir::new(static_dir.as_ref()).append_index_html_on_directories(true);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

/// Binds `config.socket_addr()` and serves until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, service: SignalingService, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    serve_on(listener, service, &config.static_dir, shutdown).await
}

/// Serves on an already bound listener.
pub async fn serve_on<F>(
    listener: TcpListener,
    service: SignalingService,
    static_dir: impl AsRef<Path>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr().context("listener has no local address")?;
    info!("Signaling server listening on http://{}", local);

    axum::serve(listener, app(service, static_dir))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")
}
