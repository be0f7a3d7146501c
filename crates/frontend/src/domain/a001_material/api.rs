use contracts::domain::a001_material::aggregate::{Material, MaterialDto};
use contracts::shared::list::{ListQuery, PaginatedResponse};

use crate::shared::api_utils::{self, with_query};

pub async fn fetch_page(query: ListQuery) -> Result<PaginatedResponse<Material>, String> {
    api_utils::get_json(&with_query("/api/material/list", &query)).await
}

/// Every live material, by name (budget material picker)
pub async fn fetch_all() -> Result<Vec<Material>, String> {
    api_utils::get_json("/api/material").await
}

pub async fn fetch_by_id(id: &str) -> Result<Material, String> {
    api_utils::get_json(&format!("/api/material/{}", id)).await
}

pub async fn save(dto: &MaterialDto) -> Result<String, String> {
    api_utils::upsert("/api/material", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/material/{}", id)).await
}

pub async fn insert_test_data() -> Result<(), String> {
    api_utils::post_empty("/api/material/testdata", &serde_json::json!({})).await
}
