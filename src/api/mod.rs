// src/api/mod.rs — HTTP receiver for collectd's write_http plugin

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc::UnboundedSender;

use crate::metric::FlatMetric;

/// Shared state for the ingest handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Channel into the sink worker.
    pub sender: UnboundedSender<FlatMetric>,
}

/// Build the axum router. collectd posts to `/` or `/collectd` depending
/// on the configured node URL, so both routes share the ingest handler.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", post(handlers::ingest))
        .route("/collectd", post(handlers::ingest))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Start the receiver; returns after Ctrl-C so the caller can drain the
/// sink worker.
pub async fn start_server(bind: &str, port: u16, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{bind}:{port}");
    let router = build_router(state);

    tracing::info!("HTTP receiver listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn test_state() -> (ApiState, mpsc::UnboundedReceiver<FlatMetric>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (ApiState { sender }, receiver)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _rx) = test_state();
        let app = build_router(state);
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
