//! Session extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use companion_chat_auth::AuthenticatedUser;

use crate::AppState;
use crate::api_error::ApiError;

/// The authenticated caller. Rejects with 401 when the session is missing
/// or invalid.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.user_id
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = state.sessions.verify(&parts.headers).await?;
        Ok(Self(user))
    }
}
