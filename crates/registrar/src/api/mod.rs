//! # Registrar API Module
//!
//! HTTP/REST API server exposing the member registry operations.

pub mod routes;
pub mod types;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::registry::MemberRegistry;
use common::config::ServerConfig;

/// API server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<MemberRegistry>,
}

impl ApiState {
    pub fn new(registry: Arc<MemberRegistry>) -> Self {
        Self { registry }
    }
}

/// API server over the member registry
pub struct ApiHandler {
    config: ServerConfig,
    state: ApiState,
}

impl ApiHandler {
    /// Create a new API handler
    pub fn new(config: ServerConfig, registry: Arc<MemberRegistry>) -> Self {
        Self {
            config,
            state: ApiState::new(registry),
        }
    }

    /// Start the API server
    pub async fn start(&self) -> Result<()> {
        let app = self.create_router();

        let listener = TcpListener::bind(self.config.listen_address()).await?;
        info!("API server listening on {}", self.config.listen_address());

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Create the Axum router with all endpoints
    pub fn create_router(&self) -> Router {
        Router::new()
            .route("/generate-code", post(routes::register_member))
            .route("/verify-member", post(routes::verify_member))
            .route("/update-member", post(routes::update_member))
            .route("/update-member-data", post(routes::update_member_column))
            .route("/member-count", get(routes::member_count))
            .route("/members", get(routes::list_members))
            .route("/migrate-db", get(routes::migrate_db))
            .route("/api/db-health", get(routes::db_health))
            .route("/health", get(routes::health_check))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }
}
