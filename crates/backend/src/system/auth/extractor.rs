use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use contracts::system::auth::SessionClaims;

use crate::shared::error::ApiError;

/// Extractor for the signed-in user
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub SessionClaims);

impl CurrentUser {
    /// Owner id used to scope business data
    pub fn owner_id(&self) -> &str {
        &self.0.sub
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are set by the auth middleware
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(ApiError::unauthorized)
    }
}
