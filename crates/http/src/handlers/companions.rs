use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::api_error::ApiError;
use crate::current_user::CurrentUser;
use crate::response_types::{CompanionSummary, CompanionsResponse};

pub async fn list_companions(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Result<Json<CompanionsResponse>, ApiError> {
    let companions = state.companions.list().await?;
    Ok(Json(CompanionsResponse {
        ok: true,
        companions: companions.into_iter().map(CompanionSummary::from).collect(),
    }))
}
