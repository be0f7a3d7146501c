use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_budget::aggregate::{
    Budget, BudgetDto, BudgetStatusInfo, ChangeStatusDto,
};
use contracts::shared::list::{ListQuery, PaginatedResponse};
use serde_json::json;

use super::parse_uuid;
use crate::domain::a003_budget;
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/budget
///
/// Open budgets only; confirmed ones are listed under /api/sales.
pub async fn list_open(
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<Budget>>, ApiError> {
    Ok(Json(
        a003_budget::service::list_open(get_connection(), user.owner_id(), &query).await?,
    ))
}

/// GET /api/budget/statuses
pub async fn statuses() -> Json<Vec<BudgetStatusInfo>> {
    Json(a003_budget::service::statuses())
}

/// GET /api/budget/:id
pub async fn get_by_id(user: CurrentUser, Path(id): Path<String>) -> Result<Json<Budget>, ApiError> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(
        a003_budget::service::get_by_id(get_connection(), user.owner_id(), uuid).await?,
    ))
}

/// POST /api/budget
pub async fn upsert(
    user: CurrentUser,
    Json(dto): Json<BudgetDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = get_connection();
    let id = match dto.id.clone() {
        Some(id) => {
            a003_budget::service::update(db, user.owner_id(), dto).await?;
            id
        }
        None => a003_budget::service::create(db, user.owner_id(), dto)
            .await?
            .to_string(),
    };
    Ok(Json(json!({"id": id})))
}

/// PUT /api/budget/:id/status
pub async fn change_status(
    user: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ChangeStatusDto>,
) -> Result<StatusCode, ApiError> {
    let uuid = parse_uuid(&id)?;
    a003_budget::service::change_status(get_connection(), user.owner_id(), uuid, dto.status_id)
        .await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/budget/:id
pub async fn delete(user: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let uuid = parse_uuid(&id)?;
    a003_budget::service::delete(get_connection(), user.owner_id(), uuid).await?;
    Ok(StatusCode::OK)
}
