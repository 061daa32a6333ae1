// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::ApiState;
use crate::metric::{self, Payload};

/// POST / and /collectd — ingest write_http JSON (object or array) and
/// fan the flattened datapoints into the sink channel.
pub async fn ingest(
    State(state): State<ApiState>,
    body: String,
) -> Result<&'static str, (StatusCode, String)> {
    let payload: Payload = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!("rejected payload: {e}");
        (StatusCode::BAD_REQUEST, format!("invalid JSON: {e}\n"))
    })?;

    let mut accepted = 0usize;
    for raw in payload.into_vec() {
        for flat in metric::flatten(raw) {
            if state.sender.send(flat).is_err() {
                tracing::error!("sink worker is gone, dropping request");
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "sink unavailable\n".into(),
                ));
            }
            accepted += 1;
        }
    }

    tracing::debug!("accepted {accepted} datapoints");
    Ok("OK\n")
}

/// GET /health — simple liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
