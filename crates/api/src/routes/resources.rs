//! Resource routes.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use kassabok_core::resource::{
    DonePatch, Resource, ResourceDraft, ResourceListParams, ResourceRepository, parse_resource_id,
};
use kassabok_core::{TransactionCategory, TransactionType};
use kassabok_shared::AppError;
use kassabok_shared::types::{Page, PageCursor, ResourceId};

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the resource routes.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: ResourceRepository + 'static,
{
    Router::new()
        .route(
            "/resources",
            get(list_resources::<R>).post(create_resource::<R>),
        )
        .route(
            "/resources/{id}",
            get(get_resource::<R>)
                .patch(patch_resource::<R>)
                .put(replace_resource::<R>)
                .delete(delete_resource::<R>),
        )
}

// ============================================================================
// Response Types
// ============================================================================

/// A resource as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    /// Resource ID.
    pub id: ResourceId,
    /// Description.
    pub description: String,
    /// Counterparty company.
    pub company: String,
    /// Author subject.
    pub author: String,
    /// Author's organization.
    pub author_name: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// VAT rate as a fraction.
    #[serde(with = "rust_decimal::serde::float")]
    pub vat: Decimal,
    /// Amount excluding VAT.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_ex_vat: Decimal,
    /// Amount including VAT.
    pub amount_inc_vat: i64,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Transaction category.
    pub transaction_category: TransactionCategory,
    /// Ledger account number.
    pub account: u16,
    /// Done flag.
    pub done: bool,
    /// Encrypted document reference.
    pub document_url: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponse {
    fn from(r: Resource) -> Self {
        Self {
            id: r.id,
            description: r.description,
            company: r.company,
            author: r.author,
            author_name: r.author_name,
            invoice_date: r.invoice_date,
            vat: r.vat.rate(),
            amount_ex_vat: r.amount_ex_vat,
            amount_inc_vat: r.amount_inc_vat,
            transaction_type: r.transaction_type,
            transaction_category: r.transaction_category,
            account: r.account.number(),
            done: r.done,
            document_url: r.document_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// One page of resources.
#[derive(Debug, Serialize)]
pub struct ResourceListResponse {
    /// Resources on this page.
    pub resources: Vec<ResourceResponse>,
    /// Total matching resources.
    pub total: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Next page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCursor>,
    /// Previous page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageCursor>,
}

impl From<Page<Resource>> for ResourceListResponse {
    fn from(page: Page<Resource>) -> Self {
        let page = page.map(ResourceResponse::from);
        Self {
            resources: page.items,
            total: page.total,
            pages: page.total_pages,
            next: page.next,
            previous: page.previous,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/resources`
async fn list_resources<R>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    query: Result<Query<ResourceListParams>, QueryRejection>,
) -> Result<Json<ResourceListResponse>, ApiError>
where
    R: ResourceRepository + 'static,
{
    let Query(params) =
        query.map_err(|e| state.reject(AppError::Validation(e.body_text())))?;

    let page = state
        .resources
        .list(&auth.caller(), &params)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(page.into()))
}

/// GET `/resources/{id}`
async fn get_resource<R>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ResourceResponse>, ApiError>
where
    R: ResourceRepository + 'static,
{
    let id = parse_resource_id(&id).map_err(|e| state.reject(e))?;

    let resource = state
        .resources
        .get(&auth.caller(), id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Json(resource.into()))
}

/// POST `/resources`
async fn create_resource<R>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    payload: Result<Json<ResourceDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError>
where
    R: ResourceRepository + 'static,
{
    let Json(draft) =
        payload.map_err(|e| state.reject(AppError::Validation(e.body_text())))?;

    let resource = state
        .resources
        .create(&auth.caller(), draft)
        .await
        .map_err(|e| state.reject(e))?;

    info!(resource_id = %resource.id, user_id = %auth.user_id(), "Resource created via API");

    Ok((StatusCode::CREATED, Json(resource.into())))
}

/// PATCH `/resources/{id}`
async fn patch_resource<R>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<DonePatch>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    R: ResourceRepository + 'static,
{
    let Json(patch) =
        payload.map_err(|e| state.reject(AppError::Validation(e.body_text())))?;
    let id = parse_resource_id(&id).map_err(|e| state.reject(e))?;

    state
        .resources
        .set_done(&auth.caller(), id, &patch)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/resources/{id}`
async fn replace_resource<R>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ResourceDraft>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    R: ResourceRepository + 'static,
{
    let Json(draft) =
        payload.map_err(|e| state.reject(AppError::Validation(e.body_text())))?;
    let id = parse_resource_id(&id).map_err(|e| state.reject(e))?;

    state
        .resources
        .replace(&auth.caller(), id, draft)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/resources/{id}`
async fn delete_resource<R>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: ResourceRepository + 'static,
{
    let id = parse_resource_id(&id).map_err(|e| state.reject(e))?;

    state
        .resources
        .delete(&auth.caller(), id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Router tests against the in-memory store.
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, Response, header::AUTHORIZATION, header::CONTENT_TYPE},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use kassabok_core::DocumentCipher;
    use kassabok_core::resource::{InMemoryResourceRepository, ResourceService};
    use kassabok_shared::config::ServerConfig;
    use kassabok_shared::{Environment, JwtConfig, JwtService};

    use super::*;
    use crate::create_router;

    struct TestApp {
        router: Router,
        jwt: Arc<JwtService>,
    }

    impl TestApp {
        fn new(environment: Environment) -> Self {
            let jwt = Arc::new(JwtService::new(JwtConfig::default()).unwrap());
            let cipher = Arc::new(DocumentCipher::new("router-test-secret").unwrap());
            let repo = Arc::new(InMemoryResourceRepository::new());

            let state = AppState {
                resources: ResourceService::new(repo, cipher),
                jwt_service: Arc::clone(&jwt),
                environment,
            };

            Self {
                router: create_router(state, &ServerConfig::default()),
                jwt,
            }
        }

        fn token(&self, sub: &str, admin: bool) -> String {
            self.jwt
                .generate_access_token(sub, &format!("{sub} AB"), admin)
                .unwrap()
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> Response<Body> {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            self.router
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap()
        }

        async fn create(&self, token: &str, date: &str) -> Value {
            let response = self
                .send("POST", "/api/v1/resources", Some(token), Some(draft(date)))
                .await;
            assert_eq!(response.status(), StatusCode::CREATED);
            json_of(response).await
        }
    }

    fn draft(date: &str) -> Value {
        json!({
            "date": date,
            "description": "Diesel <b>van</b>",
            "company": "Circle K",
            "transactionType": "leverantörsfaktura",
            "transactionCategory": "bensin",
            "amountExVat": 1256.12,
            "vat": 0.25,
            "documentUrl": "https://files.example.com/receipt.pdf"
        })
    }

    async fn json_of(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health_are_public() {
        let app = TestApp::new(Environment::Production);

        let response = app.send("GET", "/api/v1", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await["message"], "Resources API");

        let response = app.send("GET", "/api/v1/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_is_401() {
        let app = TestApp::new(Environment::Production);

        let response = app.send("GET", "/api/v1/resources", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_of(response).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "Access token invalid or not provided.");
        assert!(body.get("cause").is_none());

        let response = app
            .send("GET", "/api/v1/resources", Some("not.a.jwt"), None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_returns_derived_fields() {
        let app = TestApp::new(Environment::Production);
        let token = app.token("alice", false);

        let body = app.create(&token, "2024-03-01").await;

        assert_eq!(body["author"], "alice");
        assert_eq!(body["authorName"], "alice AB");
        assert_eq!(body["description"], "Diesel bvan/b");
        assert_eq!(body["invoiceDate"], "2024-03-01");
        assert_eq!(body["transactionType"], "supplier-invoice");
        assert_eq!(body["transactionCategory"], "fuel");
        assert_eq!(body["account"], 5611);
        assert_eq!(body["amountIncVat"], 1571);
        assert_eq!(body["amountExVat"], 1256.12);
        assert_eq!(body["vat"], 0.25);
        assert_eq!(body["done"], false);
        assert_ne!(body["documentUrl"], "https://files.example.com/receipt.pdf");
        assert!(body.get("_id").is_none());
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_create_validation_errors_are_400() {
        let app = TestApp::new(Environment::Development);
        let token = app.token("alice", false);

        let mut missing = draft("2024-03-01");
        missing.as_object_mut().unwrap().remove("company");
        let response = app
            .send("POST", "/api/v1/resources", Some(&token), Some(missing))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_of(response).await;
        assert_eq!(body["status"], 400);
        assert!(body["cause"].as_str().unwrap().contains("company"));
        assert!(body["stack"].is_array());

        let response = app
            .send(
                "POST",
                "/api/v1/resources",
                Some(&token),
                Some(json!({"amountExVat": "lots"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let list = app
            .send("GET", "/api/v1/resources", Some(&token), None)
            .await;
        assert_eq!(json_of(list).await["total"], 0);
    }

    #[tokio::test]
    async fn test_create_requires_company_claim() {
        let app = TestApp::new(Environment::Production);
        let token = app.jwt.generate_access_token("alice", "", false).unwrap();

        let response = app
            .send("POST", "/api/v1/resources", Some(&token), Some(draft("2024-03-01")))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let list = app
            .send("GET", "/api/v1/resources", Some(&token), None)
            .await;
        assert_eq!(json_of(list).await["total"], 0);
    }

    #[tokio::test]
    async fn test_get_access_rules() {
        let app = TestApp::new(Environment::Production);
        let alice = app.token("alice", false);
        let bob = app.token("bob", false);
        let admin = app.token("root", true);

        let created = app.create(&alice, "2024-03-01").await;
        let uri = format!("/api/v1/resources/{}", created["id"].as_str().unwrap());

        assert_eq!(
            app.send("GET", &uri, Some(&alice), None).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            app.send("GET", &uri, Some(&bob), None).await.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            app.send("GET", &uri, Some(&admin), None).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            app.send("GET", "/api/v1/resources/not-an-id", Some(&alice), None)
                .await
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            app.send(
                "GET",
                &format!("/api/v1/resources/{}", ResourceId::new()),
                Some(&alice),
                None
            )
            .await
            .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_list_pagination_metadata() {
        let app = TestApp::new(Environment::Production);
        let alice = app.token("alice", false);
        for day in 1..=25 {
            app.create(&alice, &format!("2024-01-{day:02}")).await;
        }
        app.create(&app.token("bob", false), "2024-01-01").await;

        let response = app
            .send("GET", "/api/v1/resources?limit=10", Some(&alice), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_of(response).await;
        assert_eq!(body["resources"].as_array().unwrap().len(), 10);
        assert_eq!(body["total"], 25);
        assert_eq!(body["pages"], 3);
        assert_eq!(body["next"], json!({"page": 2, "limit": 10}));
        assert!(body.get("previous").is_none());
        assert_eq!(body["resources"][0]["invoiceDate"], "2024-01-25");

        let body = json_of(
            app.send("GET", "/api/v1/resources?page=3&limit=10", Some(&alice), None)
                .await,
        )
        .await;
        assert!(body.get("next").is_none());
        assert_eq!(body["previous"], json!({"page": 2, "limit": 10}));

        let response = app
            .send("GET", "/api/v1/resources?page=abc", Some(&alice), None)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_is_admin_only() {
        let app = TestApp::new(Environment::Production);
        let alice = app.token("alice", false);
        let admin = app.token("root", true);

        let created = app.create(&alice, "2024-03-01").await;
        let uri = format!("/api/v1/resources/{}", created["id"].as_str().unwrap());

        let response = app
            .send("PATCH", &uri, Some(&alice), Some(json!({"done": true})))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .send("PATCH", &uri, Some(&admin), Some(json!({"done": "yes"})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send("PATCH", &uri, Some(&admin), Some(json!({"done": "true"})))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = json_of(app.send("GET", &uri, Some(&alice), None).await).await;
        assert_eq!(body["done"], true);
    }

    #[tokio::test]
    async fn test_put_replaces_for_owner() {
        let app = TestApp::new(Environment::Production);
        let alice = app.token("alice", false);
        let bob = app.token("bob", false);

        let created = app.create(&alice, "2024-03-01").await;
        let uri = format!("/api/v1/resources/{}", created["id"].as_str().unwrap());

        let mut update = draft("2024-04-01");
        update["transactionType"] = json!("kundfaktura");

        let response = app
            .send("PUT", &uri, Some(&bob), Some(update.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.send("PUT", &uri, Some(&alice), Some(update)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = json_of(app.send("GET", &uri, Some(&alice), None).await).await;
        assert_eq!(body["account"], 3010);
        assert_eq!(body["invoiceDate"], "2024-04-01");
        assert_eq!(body["author"], "alice");
    }

    #[tokio::test]
    async fn test_delete_is_admin_only() {
        let app = TestApp::new(Environment::Production);
        let alice = app.token("alice", false);
        let admin = app.token("root", true);

        let created = app.create(&alice, "2024-03-01").await;
        let uri = format!("/api/v1/resources/{}", created["id"].as_str().unwrap());

        assert_eq!(
            app.send("DELETE", &uri, Some(&alice), None).await.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            app.send("DELETE", &uri, Some(&admin), None).await.status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            app.send("DELETE", &uri, Some(&admin), None).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
