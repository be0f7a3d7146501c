use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_tool::aggregate::{Tool, ToolDto};
use contracts::shared::list::{ListQuery, PaginatedResponse};
use serde_json::json;

use super::parse_uuid;
use crate::domain::a002_tool;
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/tool
pub async fn list_all(user: CurrentUser) -> Result<Json<Vec<Tool>>, ApiError> {
    Ok(Json(
        a002_tool::service::list_all(get_connection(), user.owner_id()).await?,
    ))
}

/// GET /api/tool/list
pub async fn list_paginated(
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<Tool>>, ApiError> {
    Ok(Json(
        a002_tool::service::list_paginated(get_connection(), user.owner_id(), &query).await?,
    ))
}

/// GET /api/tool/:id
pub async fn get_by_id(user: CurrentUser, Path(id): Path<String>) -> Result<Json<Tool>, ApiError> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(
        a002_tool::service::get_by_id(get_connection(), user.owner_id(), uuid).await?,
    ))
}

/// POST /api/tool
pub async fn upsert(
    user: CurrentUser,
    Json(dto): Json<ToolDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = get_connection();
    let id = match dto.id.clone() {
        Some(id) => {
            a002_tool::service::update(db, user.owner_id(), dto).await?;
            id
        }
        None => a002_tool::service::create(db, user.owner_id(), dto)
            .await?
            .to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/tool/:id
pub async fn delete(user: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let uuid = parse_uuid(&id)?;
    a002_tool::service::delete(get_connection(), user.owner_id(), uuid).await?;
    Ok(StatusCode::OK)
}
