use super::extract::{ApiJson, ApiPath};
use super::{blocking, AppState};
use crate::app::{
    fan_create, fan_delete, fan_get, fan_list, fan_update, FanCreateReq, FanDto, FanListItemDto,
    FanUpdateReq,
};
use crate::error::AppError;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

/// GET /fans
async fn list(State(pool): State<AppState>) -> Result<Json<Vec<FanListItemDto>>, AppError> {
    blocking(&pool, fan_list).await.map(Json)
}

/// POST /fans
async fn create(
    State(pool): State<AppState>,
    ApiJson(req): ApiJson<FanCreateReq>,
) -> Result<(StatusCode, Json<FanDto>), AppError> {
    let fan = blocking(&pool, move |p| fan_create(p, req)).await?;
    Ok((StatusCode::CREATED, Json(fan)))
}

/// GET /fans/{id}
async fn get_one(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<FanDto>, AppError> {
    blocking(&pool, move |p| fan_get(p, id)).await.map(Json)
}

/// PUT /fans/{id}
async fn update(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut req): ApiJson<FanUpdateReq>,
) -> Result<Json<FanDto>, AppError> {
    req.id = id;
    blocking(&pool, move |p| fan_update(p, req)).await.map(Json)
}

/// DELETE /fans/{id}
async fn delete(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    blocking(&pool, move |p| fan_delete(p, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fans", get(list).post(create))
        .route("/fans/{id}", get(get_one).put(update).delete(delete))
}
