use contracts::domain::a002_tool::aggregate::{Tool, ToolDto};
use contracts::shared::list::{ListQuery, PaginatedResponse};

use crate::shared::api_utils::{self, with_query};

pub async fn fetch_page(query: ListQuery) -> Result<PaginatedResponse<Tool>, String> {
    api_utils::get_json(&with_query("/api/tool/list", &query)).await
}

pub async fn fetch_by_id(id: &str) -> Result<Tool, String> {
    api_utils::get_json(&format!("/api/tool/{}", id)).await
}

pub async fn save(dto: &ToolDto) -> Result<String, String> {
    api_utils::upsert("/api/tool", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/tool/{}", id)).await
}
