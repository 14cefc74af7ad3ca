//! Health and database diagnostic routes

use crate::api::types::*;
use crate::api::ApiState;
use axum::{extract::State, Json};
use tracing::{error, info};

/// Service liveness check
pub async fn health_check(State(_state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: common::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run the idempotent schema bootstrap on demand
pub async fn migrate_db(State(state): State<ApiState>) -> Result<Json<MigrateResponse>, ApiError> {
    info!("Explicit migration requested");

    let store = state.registry.store();
    store.run_migrations().await.map_err(|e| {
        error!("Migration failed: {:#}", e);
        ApiError::InternalError("Migration failed".to_string())
    })?;

    let tables = store
        .table_names()
        .await
        .map_err(crate::registry::RegistryError::Storage)?;

    Ok(Json(MigrateResponse {
        success: true,
        message: "Migrations completed".to_string(),
        tables,
    }))
}

/// Database health diagnostic: connectivity, tables, and a persistence probe
pub async fn db_health(State(state): State<ApiState>) -> Result<Json<DbHealthResponse>, ApiError> {
    let store = state.registry.store();

    store.health_check().await.map_err(|e| {
        error!("Database health check failed: {:#}", e);
        ApiError::InternalError("Database unreachable".to_string())
    })?;

    let tables = store
        .table_names()
        .await
        .map_err(crate::registry::RegistryError::Storage)?;
    let member_count = store
        .count_members()
        .await
        .map_err(crate::registry::RegistryError::Storage)?;
    let recent_probes = store
        .probe_persistence()
        .await
        .map_err(crate::registry::RegistryError::Storage)?;

    Ok(Json(DbHealthResponse {
        success: true,
        tables,
        member_count,
        recent_probes,
    }))
}
