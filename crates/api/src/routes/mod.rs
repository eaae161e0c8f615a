//! API route definitions.

use axum::{Json, Router, middleware, routing::get};
use serde::Serialize;

use kassabok_core::resource::ResourceRepository;

use crate::{AppState, middleware::auth_middleware};

pub mod health;
pub mod resources;

/// Root response.
#[derive(Serialize)]
pub struct RootResponse {
    /// Greeting.
    pub message: &'static str,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Resources API",
    })
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state<R>(state: AppState<R>) -> Router<AppState<R>>
where
    R: ResourceRepository + 'static,
{
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(resources::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R>,
        ));

    // Combine public and protected routes
    Router::new()
        .route("/", get(root))
        .merge(health::routes())
        .merge(protected_routes)
}
