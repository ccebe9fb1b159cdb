//! Sweet Shop Backend
//! Mission: Inventory management API with JWT authentication

use anyhow::{Context, Result};
use std::sync::Arc;
use sweetshop_backend::{
    auth::{JwtHandler, UserStore},
    config::{Config, DEV_JWT_SECRET},
    db,
    inventory::SweetStore,
    server::{build_router, AppState},
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    info!("🍬 Sweet Shop backend starting");

    if config.jwt_secret == DEV_JWT_SECRET {
        warn!("⚠️  JWT_SECRET not set - using the development fallback secret");
    }

    let db = db::open(&config.database_path)?;

    let users = Arc::new(UserStore::new(db.clone()));
    let sweets = Arc::new(SweetStore::new(db));
    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()));

    users
        .ensure_admin(&config.admin_username, &config.admin_password)
        .context("Failed to seed admin user")?;

    let app = build_router(AppState { users, sweets, jwt });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter support
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweetshop_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
