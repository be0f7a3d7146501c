use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};

use crate::shared::api_utils;

pub async fn fetch_users() -> Result<Vec<User>, String> {
    api_utils::get_json("/api/system/users").await
}

/// Create new user, returns its id
pub async fn create_user(dto: &CreateUserDto) -> Result<String, String> {
    api_utils::upsert("/api/system/users", dto).await
}

pub async fn update_user(dto: &UpdateUserDto) -> Result<(), String> {
    api_utils::put_json(&format!("/api/system/users/{}", dto.id), dto).await
}

pub async fn delete_user(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/system/users/{}", id)).await
}

pub async fn change_password(dto: &ChangePasswordDto) -> Result<(), String> {
    api_utils::post_empty(
        &format!("/api/system/users/{}/change-password", dto.user_id),
        dto,
    )
    .await
}
