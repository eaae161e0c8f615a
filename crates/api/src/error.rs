//! Error rendering for HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use kassabok_core::resource::ResourceError;
use kassabok_shared::AppError;

/// An error on its way to the client.
///
/// Clients always get the generic message for the status. In development
/// the specific cause and the error's source chain are included too.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    stack: Vec<String>,
    verbose: bool,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,
    /// Generic message for the status.
    pub message: &'static str,
    /// Specific reason, development only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Error source chain, development only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

impl ApiError {
    /// Wraps any error that converts into an [`AppError`], remembering its source chain.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Into<AppError>,
    {
        let mut stack = vec![err.to_string()];
        let mut source = err.source();
        while let Some(inner) = source {
            stack.push(inner.to_string());
            source = inner.source();
        }

        Self {
            error: err.into(),
            stack,
            verbose: false,
        }
    }

    /// Includes the cause and source chain in the body when `verbose` is set.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::new(error)
    }
}

impl From<ResourceError> for ApiError {
    fn from(error: ResourceError) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.error.is_server_error() {
            error!(code = self.error.error_code(), error = %self.error, "Request failed");
        } else {
            warn!(code = self.error.error_code(), error = %self.error, "Request rejected");
        }

        let body = ErrorBody {
            status: status.as_u16(),
            message: self.error.public_message(),
            cause: self.verbose.then(|| self.error.to_string()),
            stack: self.verbose.then_some(self.stack),
        };

        (status, Json(body)).into_response()
    }
}
