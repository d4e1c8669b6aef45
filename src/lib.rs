//! Products API Library
//!
//! CRUD service for products with hypermedia navigation links, built on axum
//! and sea-orm.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod links;
pub mod openapi;
pub mod repositories;
pub mod tracing;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::repositories::{ProductRepository, SeaOrmProductRepository};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    /// State backed by the sea-orm product store on `db`
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let products = Arc::new(SeaOrmProductRepository::new(db.clone()));
        Self {
            db,
            config,
            products,
        }
    }

    /// Replaces the product store, e.g. with an in-memory one
    pub fn with_products(mut self, products: Arc<dyn ProductRepository>) -> Self {
        self.products = products;
        self
    }
}

/// Builds the CORS layer from configuration.
///
/// Explicit origins win; otherwise development (or the override flag) gets a
/// permissive layer and anything else gets no cross-origin access.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        ::tracing::info!("Using configured CORS origins ({})", origins.len());
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// Assembles the full HTTP application: product routes, health, Swagger UI,
/// request ids, HTTP tracing, CORS and the body size limit
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.max_body_size;

    Router::<AppState>::new()
        .merge(handlers::products::products_routes())
        .merge(health::health_routes())
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(body_limit))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            crate::tracing::request_id_middleware,
        ))
        .with_state(state)
}
