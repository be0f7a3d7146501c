use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/system/users (admin only)
pub async fn list(CurrentUser(_claims): CurrentUser) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(service::list_all(get_connection()).await?))
}

/// GET /api/system/users/:id (admin only)
pub async fn get_by_id(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(service::get_by_id(get_connection(), &id).await?))
}

/// POST /api/system/users (admin only)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = service::create(get_connection(), dto, Some(claims.sub)).await?;
    Ok(Json(serde_json::json!({"id": user_id})))
}

/// PUT /api/system/users/:id (admin only)
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> Result<StatusCode, ApiError> {
    dto.id = id;
    service::update(get_connection(), dto, &claims.sub).await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/system/users/:id (admin only)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete(get_connection(), &id, &claims.sub).await?;
    Ok(StatusCode::OK)
}

/// POST /api/system/users/:id/change-password
pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> Result<StatusCode, ApiError> {
    dto.user_id = id;
    service::change_password(get_connection(), dto, &claims.sub, &claims.sid).await?;
    Ok(StatusCode::OK)
}
