//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Error rendering

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use kassabok_core::resource::{ResourceRepository, ResourceService};
use kassabok_shared::config::ServerConfig;
use kassabok_shared::{AppError, Environment, JwtService};

pub use error::ApiError;

/// Application state shared across handlers.
pub struct AppState<R: ResourceRepository> {
    /// Resource service.
    pub resources: ResourceService<R>,
    /// JWT service for token verification.
    pub jwt_service: Arc<JwtService>,
    /// Deployment environment, controls error detail.
    pub environment: Environment,
}

impl<R: ResourceRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            resources: self.resources.clone(),
            jwt_service: Arc::clone(&self.jwt_service),
            environment: self.environment,
        }
    }
}

impl<R: ResourceRepository> AppState<R> {
    /// Turns an error into a response error with the environment's level of detail.
    pub fn reject<E>(&self, err: E) -> ApiError
    where
        E: std::error::Error + Into<AppError>,
    {
        ApiError::new(err).verbose(self.environment.exposes_error_details())
    }
}

/// Creates the main application router.
pub fn create_router<R>(state: AppState<R>, server: &ServerConfig) -> Router
where
    R: ResourceRepository + 'static,
{
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION]))
        .layer(cors_layer(&server.cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            warn!(origin, "Invalid CORS origin, cross-origin requests will be refused");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
