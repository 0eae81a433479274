//! HTTP serving surface (spec §4.7, §6), gated behind the `api` feature.

mod json;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::pipeline::Pipeline;
use routes::AppState;

/// Builds the router: `POST /generate`, `GET /map`, `GET /ranking`,
/// `GET /asn/:asn` (spec §6 EXTERNAL INTERFACES table).
pub fn router(pipeline: Arc<Pipeline>, auth_token: String) -> Router {
    let state = Arc::new(AppState { pipeline, auth_token });
    Router::new()
        .route("/generate", post(routes::generate))
        .route("/map", get(routes::map))
        .route("/ranking", get(routes::ranking))
        .route("/asn/:asn", get(routes::asn))
        .with_state(state)
}

/// Runs the API server until a shutdown signal (Ctrl-C/SIGTERM) arrives,
/// matching the original's "start the HTTP server" branch in `main()`.
/// A generation is kicked off in the background on startup, mirroring
/// the original's `go server.generateMap()` before `ListenAndServe`.
pub async fn serve(listen_addr: SocketAddr, pipeline: Pipeline, auth_token: String) -> std::io::Result<()> {
    let pipeline = Arc::new(pipeline);

    let startup_pipeline = pipeline.clone();
    std::thread::spawn(move || {
        let now = chrono::Utc::now().timestamp() as u64;
        if let Err(e) = startup_pipeline.generate(now) {
            log::error!("startup generation failed: {e}");
        }
    });

    let app = router(pipeline, auth_token);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    log::info!("starting HTTP server on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
