use super::extract::{ApiJson, ApiPath};
use super::{blocking, AppState};
use crate::app::{
    fan_subscription_options, fan_subscriptions, subscription_reconcile, SubscriptionDto,
    SubscriptionOptionDto, SubscriptionReconcileReq,
};
use crate::domain::Reconciliation;
use crate::error::AppError;
use axum::{extract::State, routing::get, Json, Router};

/// GET /fans/{id}/subscriptions
async fn list(
    State(pool): State<AppState>,
    ApiPath(fan_id): ApiPath<i64>,
) -> Result<Json<Vec<SubscriptionDto>>, AppError> {
    blocking(&pool, move |p| fan_subscriptions(p, fan_id))
        .await
        .map(Json)
}

/// GET /fans/{id}/subscriptions/edit
async fn options(
    State(pool): State<AppState>,
    ApiPath(fan_id): ApiPath<i64>,
) -> Result<Json<Vec<SubscriptionOptionDto>>, AppError> {
    blocking(&pool, move |p| fan_subscription_options(p, fan_id))
        .await
        .map(Json)
}

/// PUT /fans/{id}/subscriptions
async fn reconcile(
    State(pool): State<AppState>,
    ApiPath(fan_id): ApiPath<i64>,
    ApiJson(mut req): ApiJson<SubscriptionReconcileReq>,
) -> Result<Json<Reconciliation>, AppError> {
    req.fan_id = fan_id;
    blocking(&pool, move |p| subscription_reconcile(p, req))
        .await
        .map(Json)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fans/{id}/subscriptions", get(list).put(reconcile))
        .route("/fans/{id}/subscriptions/edit", get(options))
}
