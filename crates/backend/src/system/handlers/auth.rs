use axum::{
    extract::Json,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Duration;
use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};
use contracts::system::users::User;

use crate::shared::config::get_config;
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::{cookie, session};
use crate::system::users::service as user_service;

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        is_admin: user.is_admin,
    }
}

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let db = get_connection();
    let auth = &get_config().auth;

    let user = user_service::verify_credentials(db, &request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Email o contraseña incorrectos".into()))?;

    let lifetime = if request.remember {
        Duration::days(auth.remember_days)
    } else {
        Duration::hours(auth.session_hours)
    };

    let issued = session::start_session(db, &user.id, &user.email, user.is_admin, lifetime)
        .await?;

    let max_age = request.remember.then(|| lifetime.num_seconds());
    let set_cookie = cookie::session_cookie(&issued.token, max_age, auth.cookie_secure);

    tracing::info!("User {} logged in", user.email);

    Ok((
        [(header::SET_COOKIE, set_cookie)],
        Json(LoginResponse {
            user: user_info(user),
        }),
    ))
}

/// POST /api/system/auth/logout
///
/// Always clears the cookie, even when the session is already gone.
pub async fn logout(headers: HeaderMap) -> impl IntoResponse {
    let db = get_connection();

    if let Some(token) = cookie::session_token(&headers) {
        match session::resolve_session(db, &token).await {
            Ok(Some(claims)) => {
                if let Err(e) = session::revoke_session(db, &claims.sid).await {
                    tracing::error!("Failed to revoke session {}: {:#}", claims.sid, e);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Logout with unreadable session: {:#}", e),
        }
    }

    (
        [(
            header::SET_COOKIE,
            cookie::expired_cookie(get_config().auth.cookie_secure),
        )],
        StatusCode::OK,
    )
}

/// GET /api/system/auth/me
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, ApiError> {
    let user = user_service::get_by_id(get_connection(), &claims.sub).await?;
    Ok(Json(user_info(user)))
}
