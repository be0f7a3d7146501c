use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};

use crate::shared::api_utils::{get_json, post_empty, post_json};

/// Login; the backend answers with the `__session` cookie
pub async fn login(email: String, password: String, remember: bool) -> Result<LoginResponse, String> {
    let request = LoginRequest {
        email,
        password,
        remember,
    };
    post_json("/api/system/auth/login", &request).await
}

/// Logout (revokes the session and clears the cookie)
pub async fn logout() -> Result<(), String> {
    post_empty("/api/system/auth/logout", &serde_json::json!({})).await
}

/// Current user for the session cookie, if any
pub async fn get_current_user() -> Result<UserInfo, String> {
    get_json("/api/system/auth/me").await
}
