//! HTTP boundary for the Scoop node.
//!
//! axum only provides the transport here: every request goes to a single
//! fallback that resolves it through the resource [`RouteTable`], decodes the
//! body and calls the matched handler. CORS preflight requests are answered by
//! the CORS layer before reaching it.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use scoop_store::ContentStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::ApiError,
    handlers::{self, Handler, Payload, Reply},
    observability::request_id_layer,
    persistence::SnapshotFile,
    routing::RouteTable,
};

/// How long browsers may cache a preflight response.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Content store.
    pub store: Arc<ContentStore>,
    /// Snapshot file written after each mutating request, if any.
    pub snapshots: Option<Arc<SnapshotFile>>,
    routes: Arc<RouteTable<Handler>>,
}

impl AppState {
    /// Creates state serving `store` without persistence.
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self {
            store,
            snapshots: None,
            routes: Arc::new(handlers::routes()),
        }
    }

    /// Enables snapshot persistence.
    pub fn with_snapshots(mut self, snapshots: Arc<SnapshotFile>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(cors_layer())
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-http-method-override"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .max_age(PREFLIGHT_MAX_AGE)
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let reply = match handle(&state, &method, uri.path(), &body) {
        Ok(reply) => reply,
        Err(err) => return err.into_response(),
    };

    if method != Method::GET {
        save_snapshot(&state).await;
    }
    reply.into_response()
}

/// Resolves, decodes and runs a request against the store.
fn handle(state: &AppState, method: &Method, path: &str, body: &[u8]) -> Result<Reply, ApiError> {
    let (handler, param) = state.routes.resolve(method, path)?;
    let payload = decode_payload(method, body)?;
    handler(state.store.as_ref(), &param, &payload)
}

/// GET and DELETE requests carry no body; every other method must send JSON.
fn decode_payload(method: &Method, body: &[u8]) -> Result<Payload, ApiError> {
    if method == Method::GET || method == Method::DELETE {
        return Ok(Payload::empty());
    }
    serde_json::from_slice(body)
        .map(Payload::new)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

async fn save_snapshot(state: &AppState) {
    let Some(snapshots) = state.snapshots.clone() else {
        return;
    };
    let store = Arc::clone(&state.store);

    match tokio::task::spawn_blocking(move || snapshots.persist(&store)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(error = %err, "Failed to save snapshot"),
        Err(err) => tracing::error!(error = %err, "Snapshot task failed"),
    }
}
