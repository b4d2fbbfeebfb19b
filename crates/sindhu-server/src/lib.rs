//! Sindhu Furniture & Electronics storefront server
//!
//! REST API over a pluggable catalog store. The router is built here so the
//! binary and the integration tests share one wiring.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use crate::config::ServerConfig;
use services::AuthService;
use sindhu_core::CatalogStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub auth_service: Arc<AuthService>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: ServerConfig) -> Self {
        let auth_service = Arc::new(AuthService::new(store.clone(), config.jwt_secret.clone()));
        Self {
            store,
            auth_service,
            config: Arc::new(config),
        }
    }
}

/// Open the configured store, seed it and bootstrap the admin account
pub async fn build_state(config: ServerConfig) -> Result<AppState> {
    let store = storage::open(&config).await?;

    if config.seed_sample_data && storage::seed::seed_if_empty(store.as_ref()).await? {
        info!("Seeded sample catalog");
    }

    let state = AppState::new(store, config);

    if let Some((username, password)) = state.config.admin_credentials() {
        state
            .auth_service
            .ensure_user(username, password)
            .await
            .context("Failed to create admin account")?;
    }

    Ok(state)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::{auth, contact, products, reviews, testimonials};

    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/featured", get(products::featured))
        .route("/products/category/:category", get(products::by_category))
        .route(
            "/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/products/:id/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route(
            "/testimonials",
            get(testimonials::list).post(testimonials::create),
        )
        .route(
            "/testimonials/:id",
            axum::routing::put(testimonials::update).delete(testimonials::delete),
        )
        .route("/contact", post(contact::submit))
        .route("/contact/messages", get(contact::messages))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
}
