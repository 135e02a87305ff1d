//! Request-level failures and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::counter::CounterError;
use crate::template::TemplateError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("token mismatch")]
    Unauthorized,

    #[error("counter: {0}")]
    Counter(#[from] CounterError),

    #[error("{0}")]
    Template(TemplateError),

    #[error("crash requested but the process kept running")]
    CrashReturned,
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound { path, source } => {
                tracing::debug!("file not found: \"{}\" ({})", path.display(), source);
                AppError::NotFound(path.display().to_string())
            }
            other => AppError::Template(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client. Never carries configuration values.
    fn public_message(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "404 page not found",
            AppError::Unauthorized => "Authentication error",
            AppError::Counter(CounterError::Read { .. }) => "Error reading count file",
            AppError::Counter(CounterError::Parse { .. }) => "Error parsing count file",
            AppError::Counter(CounterError::Overflow { .. }) => "Error incrementing count",
            AppError::Counter(CounterError::Write { .. }) => "Error writing count file",
            AppError::Template(_) => "Error executing template",
            AppError::CrashReturned => "Crash requested",
        }
    }

    /// Logs the failure with the request it belongs to.
    pub fn log(&self, request: &str, path: &str) {
        match self.status() {
            StatusCode::NOT_FOUND => tracing::debug!("{} {} not found: {}", request, path, self),
            StatusCode::UNAUTHORIZED => tracing::warn!("{} {} unauthorized: {}", request, path, self),
            _ => tracing::error!("{} {} failed: {}", request, path, self),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self.public_message())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        let parse = AppError::from(CounterError::Parse {
            path: PathBuf::from("state/count"),
            content: "abc".into(),
        });
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse.public_message(), "Error parsing count file");

        let overflow = AppError::from(CounterError::Overflow {
            path: PathBuf::from("state/count"),
        });
        assert_eq!(overflow.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_template_becomes_not_found() {
        let err = AppError::from(TemplateError::NotFound {
            path: PathBuf::from("data/nope"),
            source: std::io::ErrorKind::NotFound.into(),
        });
        assert!(matches!(err, AppError::NotFound(_)));

        let err = AppError::from(TemplateError::Exec("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
