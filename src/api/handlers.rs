//! Rules API handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::auth::UserIdentity;
use crate::hostcfg::{validate, HostConfigRequest, HostData};
use crate::rules::{assemble, constraint_table, Rule};
use crate::store::{Plan, RuleRecord, RECORD_ID_LEN};
use crate::telemetry::counters;

use super::error::ApiError;
use super::server::AppState;

/// Validate the envelope and compile the chain, counting rejections per
/// channel. Shared by create and update so both call sites apply identical
/// semantics.
fn validate_and_compile(
    body: &HostConfigRequest,
) -> Result<(HostData, Vec<Rule>), ApiError> {
    let data = validate(body).map_err(|err| {
        counters::validation_failures().inc();
        ApiError::from(err)
    })?;

    let rules = assemble(&data.expressions).map_err(|err| {
        counters::build_failures().inc();
        ApiError::from(err)
    })?;

    Ok((data, rules))
}

/// Handler-level window ceiling, tighter than the schema bound. Both are
/// enforced; this one wins in practice.
fn check_window_ceiling(data: &HostData, max_secs: u64) -> Result<(), ApiError> {
    if data.config.period > max_secs {
        return Err(ApiError::BadRequest(format!(
            "period must be at most {max_secs} seconds"
        )));
    }
    if data.config.duration > max_secs {
        return Err(ApiError::BadRequest(format!(
            "duration must be at most {max_secs} seconds"
        )));
    }
    Ok(())
}

fn check_record_id(id: &str) -> Result<(), ApiError> {
    if id.len() != RECORD_ID_LEN {
        return Err(ApiError::BadRequest("invalid id".to_string()));
    }
    Ok(())
}

/// Unwrap a JSON body, mapping parse failures onto the 400 error shape
/// instead of axum's default plain-text rejection.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(ApiError::BadRequest(format!(
            "invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

/// `POST /rules`: create a configuration.
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    payload: Result<Json<HostConfigRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = parse_body(payload)?;
    let (data, rules) = validate_and_compile(&body)?;
    check_window_ceiling(&data, state.limits.max_window_secs)?;

    // Plan quota. Check-then-insert is best-effort: a concurrent submit
    // from the same account can slip one extra record past the ceiling,
    // which costs quota drift, not corruption.
    let plan = state
        .storage
        .get_user(&user.id)
        .await?
        .map(|u| u.plan)
        .unwrap_or_default();

    if plan == Plan::Free {
        let count = state.storage.count_rules(&user.id).await?;
        if count >= state.limits.free_plan_rules {
            counters::quota_rejections().inc();
            return Err(ApiError::BadRequest(format!(
                "free plan is limited to {} rules",
                state.limits.free_plan_rules
            )));
        }
    }

    let record = RuleRecord::new(&user.id, data.config, rules);
    let id = record.id.clone();
    state.storage.insert_rule(record).await?;
    counters::rules_created().inc();

    info!(id = %id, user = %user.id, "configuration created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}

/// `PUT /rules/{id}`: replace a configuration wholesale.
pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
    payload: Result<Json<HostConfigRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    check_record_id(&id)?;

    let body = parse_body(payload)?;
    let (data, rules) = validate_and_compile(&body)?;
    check_window_ceiling(&data, state.limits.max_window_secs)?;

    if state.storage.get_rule(&id, &user.id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    if !state
        .storage
        .update_rule(&id, &user.id, data.config, rules)
        .await?
    {
        return Err(ApiError::NotFound);
    }
    counters::rules_updated().inc();

    info!(id = %id, user = %user.id, "configuration replaced");

    // Fire-and-forget: the request must not wait on (or fail with) the
    // gateway.
    let notifier = state.notifier.clone();
    let purge_id = id.clone();
    tokio::spawn(async move {
        counters::gateway_purges().inc();
        notifier.purge_host(&purge_id).await;
    });

    Ok((StatusCode::OK, Json(json!({ "success": true, "id": id }))))
}

/// `GET /rules`: list the caller's configurations.
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.storage.list_rules(&user.id).await?;
    Ok(Json(json!({ "success": true, "result": summaries })))
}

/// `GET /rules/{id}`: fetch one owned configuration.
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_record_id(&id)?;

    let record = state
        .storage
        .get_rule(&id, &user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({ "success": true, "result": record })))
}

/// `DELETE /rules/{id}`: delete an owned configuration.
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_record_id(&id)?;

    if !state.storage.delete_rule(&id, &user.id).await? {
        return Err(ApiError::NotFound);
    }
    counters::rules_deleted().inc();

    info!(id = %id, user = %user.id, "configuration deleted");

    // The gateway may still hold the deleted config in cache.
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        counters::gateway_purges().inc();
        notifier.purge_host(&id).await;
    });

    Ok(Json(json!({ "success": true })))
}

/// `GET /gateway/rules/{id}`: unauthenticated fetch for the enforcement
/// gateway, which has no user scope.
pub async fn gateway_get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_record_id(&id)?;

    let record = state
        .storage
        .get_rule_any(&id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({ "success": true, "result": record })))
}

/// `GET /constraints`: the field/operator constraint table, so client UIs
/// can restrict their input choices without duplicating the policy.
pub async fn get_constraints() -> impl IntoResponse {
    Json(json!({ "success": true, "constraints": constraint_table() }))
}

/// `GET /plans`: the caller's plan tier.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .storage
        .get_user(&user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({ "success": true, "plan": record.plan })))
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub plan: String,
}

/// `POST /plans/upgrade`: switch the caller's plan.
pub async fn upgrade_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserIdentity>,
    payload: Result<Json<UpgradeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = parse_body(payload)?;
    let plan =
        Plan::parse(&body.plan).ok_or_else(|| ApiError::BadRequest("invalid plan".to_string()))?;

    if !state.storage.set_plan(&user.id, plan).await? {
        return Err(ApiError::NotFound);
    }

    info!(user = %user.id, plan = ?plan, "plan changed");

    Ok(Json(json!({ "success": true })))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
