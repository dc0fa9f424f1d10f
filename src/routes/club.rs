use super::extract::{ApiJson, ApiPath};
use super::{blocking, AppState};
use crate::app::{
    club_create, club_delete, club_get, club_list, club_members, club_update, ClubCreateReq,
    ClubDto, ClubMemberDto, ClubUpdateReq,
};
use crate::error::AppError;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

/// GET /clubs
async fn list(State(pool): State<AppState>) -> Result<Json<Vec<ClubDto>>, AppError> {
    blocking(&pool, club_list).await.map(Json)
}

/// POST /clubs
async fn create(
    State(pool): State<AppState>,
    ApiJson(req): ApiJson<ClubCreateReq>,
) -> Result<(StatusCode, Json<ClubDto>), AppError> {
    let club = blocking(&pool, move |p| club_create(p, req)).await?;
    Ok((StatusCode::CREATED, Json(club)))
}

/// GET /clubs/{id}
async fn get_one(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ClubDto>, AppError> {
    blocking(&pool, move |p| club_get(p, &id)).await.map(Json)
}

/// PUT /clubs/{id}
async fn update(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(mut req): ApiJson<ClubUpdateReq>,
) -> Result<Json<ClubDto>, AppError> {
    req.id = id;
    blocking(&pool, move |p| club_update(p, req)).await.map(Json)
}

/// DELETE /clubs/{id}
async fn delete(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    blocking(&pool, move |p| club_delete(p, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /clubs/{id}/fans
async fn members(
    State(pool): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Vec<ClubMemberDto>>, AppError> {
    blocking(&pool, move |p| club_members(p, &id)).await.map(Json)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clubs", get(list).post(create))
        .route("/clubs/{id}", get(get_one).put(update).delete(delete))
        .route("/clubs/{id}/fans", get(members))
}
