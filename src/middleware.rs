//! Request logging middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use nanoid::nanoid;
use std::time::Instant;
use tracing::info;

use crate::colors::{colored_id, colored_tag};
use crate::routing::Route;

/// Short per-request identifier stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags each request with a colored nanoid, logs it on the way in and logs
/// the status, route and latency on the way out.
pub async fn log_requests(mut req: Request<Body>, next: Next) -> Response {
    let id = nanoid!(5);
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    req.extensions_mut().insert(RequestId(id.clone()));

    info!("{} → {} {}", colored_id(&id), method, path);
    let response = next.run(req).await;

    let status = response.status();
    let tag = response
        .extensions()
        .get::<Route>()
        .map_or("UNMATCHED", |route| route.label());
    info!(
        "{} ← {} {} ({}ms)",
        colored_id(&id),
        colored_tag(tag, status.as_u16()),
        status,
        start.elapsed().as_millis()
    );
    response
}
