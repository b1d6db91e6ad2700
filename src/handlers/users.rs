use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::models::{Page, PageParams, UserDto};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::extract::{PathParam, QueryParams, ValidatedJson};

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UserDto>,
) -> AppResult<impl IntoResponse> {
    let user = state.users.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<UserDto>> {
    let user = state.users.get_user_by_id(id).await?;
    Ok(Json(user))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserDto>>> {
    let users = state.users.get_all_users().await?;
    Ok(Json(users))
}

/// GET /users/page?page=0&size=10
pub async fn list_users_paged(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PageParams>,
) -> AppResult<Json<Page<UserDto>>> {
    let page = state.users.get_all_users_paged(params).await?;
    Ok(Json(page))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    ValidatedJson(input): ValidatedJson<UserDto>,
) -> AppResult<Json<UserDto>> {
    let user = state.users.update_user(id, input).await?;
    Ok(Json(user))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    state.users.delete_user_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/email/:email
pub async fn get_user_by_email(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> AppResult<Json<UserDto>> {
    let user = state.users.get_user_by_email(&email).await?;
    Ok(Json(user))
}
