use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

pub async fn middleware(request: Request, next: Next) -> Result<Response, Infallible> {
    let request_id = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let span = tracing::info_span!("web request", web_request_id = request_id);

    let method = request.method();
    let uri = request.uri();
    tracing::info!(parent: &span, "received request: {} {}", method, uri);

    let response = next.run(request).instrument(span.clone()).await;
    tracing::debug!(parent: &span, status = %response.status(), "sent response");
    Ok(response)
}
