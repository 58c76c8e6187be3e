//! Admin API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::telemetry::counters;

use super::AdminState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler.
pub async fn health_handler(State(state): State<Arc<AdminState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: if state.is_healthy() { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if state.is_healthy() {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Liveness handler.
pub async fn live_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness handler.
pub async fn ready_handler(State(state): State<Arc<AdminState>>) -> impl IntoResponse {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Stats response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub rules: RuleStats,
    pub rejections: RejectionStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleStats {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionStats {
    pub validation: u64,
    pub build: u64,
    pub quota: u64,
}

/// Stats handler.
pub async fn stats_handler(State(state): State<Arc<AdminState>>) -> impl IntoResponse {
    let response = StatsResponse {
        uptime_seconds: state.uptime().as_secs(),
        rules: RuleStats {
            created: counters::rules_created().get(),
            updated: counters::rules_updated().get(),
            deleted: counters::rules_deleted().get(),
        },
        rejections: RejectionStats {
            validation: counters::validation_failures().get(),
            build: counters::build_failures().get(),
            quota: counters::quota_rejections().get(),
        },
    };

    Json(response)
}

/// Metrics handler (Prometheus format).
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let output = String::from_utf8(buffer).unwrap_or_default();
            (
                StatusCode::OK,
                [("content-type", "text/plain; charset=utf-8")],
                output,
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Error encoding metrics: {}", e),
        ),
    }
}
