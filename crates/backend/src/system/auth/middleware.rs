use axum::{body::Body, extract::Request, http::HeaderMap, middleware::Next, response::Response};
use contracts::system::auth::SessionClaims;

use super::{cookie, session};
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiError;

async fn authenticate(headers: &HeaderMap) -> Result<SessionClaims, ApiError> {
    let token = cookie::session_token(headers).ok_or_else(ApiError::unauthorized)?;

    session::resolve_session(get_connection(), &token)
        .await?
        .ok_or_else(ApiError::unauthorized)
}

/// Middleware that requires a live session (cookie or Bearer token)
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let headers = req.headers().clone();
    let claims = authenticate(&headers).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires admin privileges
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let headers = req.headers().clone();
    let claims = authenticate(&headers).await?;
    if !claims.is_admin {
        return Err(ApiError::Forbidden(
            "Se requieren permisos de administrador".into(),
        ));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
