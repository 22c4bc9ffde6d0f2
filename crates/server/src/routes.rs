use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use store::KvStore;

use crate::errors::ApiError;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// GET /{key} — serve the value straight from the cache.
async fn get_value(
    State(kv): State<KvStore>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match kv.get(&key).await {
        Some(value) => Ok(Json(value)),
        None => Err(ApiError::NotFound),
    }
}

/// POST /{key} — upsert under the given key; the response does not wait for
/// the write-through save.
async fn put_value(
    State(kv): State<KvStore>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> &'static str {
    kv.put(Some(key), value).await;
    "OK"
}

/// POST / — store under a server-generated key and return that key.
async fn put_keyless(State(kv): State<KvStore>, Json(value): Json<serde_json::Value>) -> String {
    kv.put(None, value).await
}

/// DELETE /{key} — absent keys are removed just as successfully as present
/// ones.
async fn delete_value(State(kv): State<KvStore>, Path(key): Path<String>) -> &'static str {
    kv.delete(&key).await;
    "OK"
}

/// Build the full application router. `/health` wins over the `/:key`
/// wildcard, so `health` is effectively a reserved key.
pub fn build_router(kv: KvStore, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", post(put_keyless))
        .route("/:key", get(get_value).post(put_value).delete(delete_value))
        .with_state(kv)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
