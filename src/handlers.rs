//! HTTP request handlers.

use axum::{
    Router,
    body::Body,
    extract::{Extension, State},
    http::{HeaderValue, StatusCode, Uri, header},
    middleware,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::{APP_NAME, APP_VERSION};
use crate::error::AppError;
use crate::listing::list_urls;
use crate::colors::colored_id;
use crate::middleware::{RequestId, log_requests};
use crate::routing::{Route, base_name, strip};
use crate::state::AppState;

/// Builds the application: one fallback handler owns every path.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Matches the base path, then hands the remainder to exactly one route.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    uri: Uri,
) -> Response {
    let path = uri.path();
    let request = request_id.map_or_else(String::new, |Extension(RequestId(id))| colored_id(&id));
    let Some(remainder) = strip(path, &state.base_path) else {
        debug!(
            "request (path \"{}\") does not match the prefix (prefix: \"{}\")",
            path, state.base_path
        );
        return AppError::NotFound(path.to_string()).into_response();
    };

    info!(
        "request received, path: \"{}\" --> \"{}\" (with prefix \"{}\" removed)",
        path, remainder, state.base_path
    );

    let route = Route::dispatch(remainder);
    let result = match route {
        Route::Liveness => Ok("It works!\n".into_response()),
        Route::Version => {
            Ok(format!("App \"{}\" version: {}\n", APP_NAME, APP_VERSION).into_response())
        }
        Route::Crash => crash(&state),
        Route::Quit => Ok(quit(&state)),
        Route::Count => count(&state).await.map(IntoResponse::into_response),
        Route::Sensitive => sensitive(&state, path).map(IntoResponse::into_response),
        Route::ListUrls => Ok(list(&state, path)),
        Route::Template => template(&state, path).await,
    };

    let mut response = result.unwrap_or_else(|err| {
        err.log(&request, path);
        err.into_response()
    });
    response.extensions_mut().insert(route);
    response
}

fn crash(state: &AppState) -> Result<Response, AppError> {
    state.lifecycle.crash();
    Err(AppError::CrashReturned)
}

fn quit(state: &AppState) -> Response {
    let mut response = Response::new(state.lifecycle.quit());
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

async fn count(state: &AppState) -> Result<String, AppError> {
    let value = state.counter.increment_and_get().await?;
    Ok(format!("{}\n", value))
}

fn sensitive(state: &AppState, path: &str) -> Result<String, AppError> {
    let token = base_name(path);
    let info = state.secret.check(token).ok_or(AppError::Unauthorized)?;
    Ok(format!("Sensitive information: \"{}\"\n", info))
}

fn list(state: &AppState, path: &str) -> Response {
    let host = base_name(path);
    list_urls(host, state.port, &state.base_path, state.templates.dir()).into_response()
}

async fn template(state: &AppState, path: &str) -> Result<Response, AppError> {
    let rendered = state.templates.render(path).await?;
    let mime = mime_guess::from_path(base_name(path)).first_or_text_plain();

    let mut response = Response::new(Body::from(rendered));
    *response.status_mut() = StatusCode::OK;
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    Ok(response)
}
