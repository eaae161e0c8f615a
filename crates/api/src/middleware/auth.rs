//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use kassabok_core::resource::{Caller, ResourceRepository};
use kassabok_shared::{AppError, Claims, JwtError};

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are stored in the request extensions; anything else is
/// answered with 401 before the handler runs.
pub async fn auth_middleware<R>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Response
where
    R: ResourceRepository + 'static,
{
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return state
            .reject(AppError::Unauthorized(
                "Authorization header with Bearer token is required".to_string(),
            ))
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            let reason = match e {
                JwtError::Expired => "Token has expired",
                _ => "Invalid or malformed token",
            };
            state
                .reject(AppError::Unauthorized(reason.to_string()))
                .into_response()
        }
    }
}

/// Extractor for authenticated user claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.0.user_id()
    }

    /// Returns the caller identity used by the resource policy.
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller::from(&self.0)
    }
}

impl<R> FromRequestParts<AppState<R>> for AuthUser
where
    R: ResourceRepository + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<R>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                state.reject(AppError::Unauthorized("Authentication required".into()))
            })
    }
}
