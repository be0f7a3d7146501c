use contracts::domain::a003_budget::aggregate::{
    Budget, BudgetDto, BudgetStatusInfo, ChangeStatusDto,
};
use contracts::shared::list::{ListQuery, PaginatedResponse};

use crate::shared::api_utils::{self, with_query};

/// Open (not confirmed) budgets
pub async fn fetch_page(query: ListQuery) -> Result<PaginatedResponse<Budget>, String> {
    api_utils::get_json(&with_query("/api/budget", &query)).await
}

pub async fn fetch_statuses() -> Result<Vec<BudgetStatusInfo>, String> {
    api_utils::get_json("/api/budget/statuses").await
}

pub async fn fetch_by_id(id: &str) -> Result<Budget, String> {
    api_utils::get_json(&format!("/api/budget/{}", id)).await
}

pub async fn save(dto: &BudgetDto) -> Result<String, String> {
    api_utils::upsert("/api/budget", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/budget/{}", id)).await
}

pub async fn change_status(id: &str, status_id: i32) -> Result<(), String> {
    api_utils::put_json(
        &format!("/api/budget/{}/status", id),
        &ChangeStatusDto { status_id },
    )
    .await
}
