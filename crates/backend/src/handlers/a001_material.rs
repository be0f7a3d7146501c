use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_material::aggregate::{Material, MaterialDto};
use contracts::shared::list::{ListQuery, PaginatedResponse};
use serde_json::json;

use super::parse_uuid;
use crate::domain::a001_material;
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/material
pub async fn list_all(user: CurrentUser) -> Result<Json<Vec<Material>>, ApiError> {
    let items = a001_material::service::list_all(get_connection(), user.owner_id()).await?;
    Ok(Json(items))
}

/// GET /api/material/list
pub async fn list_paginated(
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<Material>>, ApiError> {
    let page =
        a001_material::service::list_paginated(get_connection(), user.owner_id(), &query).await?;
    Ok(Json(page))
}

/// GET /api/material/:id
pub async fn get_by_id(user: CurrentUser, Path(id): Path<String>) -> Result<Json<Material>, ApiError> {
    let uuid = parse_uuid(&id)?;
    let item = a001_material::service::get_by_id(get_connection(), user.owner_id(), uuid).await?;
    Ok(Json(item))
}

/// POST /api/material
pub async fn upsert(
    user: CurrentUser,
    Json(dto): Json<MaterialDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = get_connection();
    let id = match dto.id.clone() {
        Some(id) => {
            a001_material::service::update(db, user.owner_id(), dto).await?;
            id
        }
        None => a001_material::service::create(db, user.owner_id(), dto)
            .await?
            .to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/material/:id
pub async fn delete(user: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let uuid = parse_uuid(&id)?;
    a001_material::service::delete(get_connection(), user.owner_id(), uuid).await?;
    Ok(StatusCode::OK)
}

/// POST /api/material/testdata
pub async fn insert_test_data(user: CurrentUser) -> Result<StatusCode, ApiError> {
    a001_material::service::insert_test_data(get_connection(), user.owner_id()).await?;
    Ok(StatusCode::OK)
}
