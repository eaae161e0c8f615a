//! Kassabok API Server
//!
//! Main entry point for the resources service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kassabok_api::{AppState, create_router};
use kassabok_core::DocumentCipher;
use kassabok_core::resource::{InMemoryResourceRepository, ResourceRepository, ResourceService};
use kassabok_db::{PgResourceRepository, connect_with};
use kassabok_shared::config::StorageBackend;
use kassabok_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kassabok=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let jwt_config = JwtConfig {
        algorithm: config.jwt.algorithm,
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("access token expiry out of range")?,
    };
    let jwt_service = JwtService::new(jwt_config).context("Invalid JWT configuration")?;
    let cipher = DocumentCipher::new(&config.cipher.secret).context("Invalid cipher secret")?;

    match config.database.backend {
        StorageBackend::Memory => {
            info!("Using in-memory resource store");
            serve(InMemoryResourceRepository::new(), jwt_service, cipher, &config).await
        }
        StorageBackend::Postgres => {
            let db = connect_with(&config.database).await?;
            info!("Connected to database");
            serve(PgResourceRepository::new(db), jwt_service, cipher, &config).await
        }
    }
}

async fn serve<R>(
    repo: R,
    jwt_service: JwtService,
    cipher: DocumentCipher,
    config: &AppConfig,
) -> anyhow::Result<()>
where
    R: ResourceRepository + 'static,
{
    let state = AppState {
        resources: ResourceService::new(Arc::new(repo), Arc::new(cipher)),
        jwt_service: Arc::new(jwt_service),
        environment: config.environment,
    };

    let app = create_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(environment = ?config.environment, "Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
