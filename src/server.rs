//! Router assembly and shared application state.

use crate::auth::{
    api as auth_api,
    jwt::JwtHandler,
    middleware::{auth_middleware, require_admin},
    user_store::UserStore,
};
use crate::inventory::{api as inventory_api, store::SweetStore};
use crate::middleware::request_logging;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub sweets: Arc<SweetStore>,
    pub jwt: Arc<JwtHandler>,
}

/// Build the full application router.
///
/// Routes stack two independent gates: `auth_middleware` authenticates
/// every `/api/sweets` route, and `require_admin` is layered on top of the
/// mutating routes only.
pub fn build_router(state: AppState) -> Router {
    let admin = || middleware::from_fn(require_admin);

    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/login", post(auth_api::login))
        .with_state(state.clone());

    let sweets_routes = Router::new()
        .route(
            "/api/sweets",
            get(inventory_api::list_sweets)
                .merge(post(inventory_api::create_sweet).route_layer(admin())),
        )
        .route("/api/sweets/search", get(inventory_api::search_sweets))
        .route(
            "/api/sweets/:id",
            put(inventory_api::update_sweet)
                .delete(inventory_api::delete_sweet)
                .route_layer(admin()),
        )
        .route(
            "/api/sweets/:id/purchase",
            post(inventory_api::purchase_sweet),
        )
        .route(
            "/api/sweets/:id/restock",
            post(inventory_api::restock_sweet).route_layer(admin()),
        )
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(sweets_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
