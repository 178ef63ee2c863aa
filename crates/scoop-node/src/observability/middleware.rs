//! Request id propagation.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

type MiddlewareFn = fn(Request, Next) -> MiddlewareFuture;

/// Layer type returned by [`request_id_layer`].
pub type RequestIdLayer = axum::middleware::FromFnLayer<MiddlewareFn, (), (Request,)>;

/// Creates the request ID layer.
///
/// Reuses an incoming `x-request-id` header or generates a UUID, records it on
/// a `request` span and echoes it on the response.
pub fn request_id_layer() -> RequestIdLayer {
    axum::middleware::from_fn(request_id_middleware)
}

fn request_id_middleware(request: Request, next: Next) -> MiddlewareFuture {
    Box::pin(async move {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        let mut response = next.run(request).instrument(span).await;

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
        }

        response
    })
}
