use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use companion_chat_service::SendMessage;

use crate::AppState;
use crate::api_error::ApiError;
use crate::current_user::CurrentUser;
use crate::query_types::HistoryQuery;
use crate::response_types::{HistoryResponse, OkBody, SendResponse};

pub async fn history(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query?;
    let history = state.chat.history(user.id(), &query.companion_id).await?;
    Ok(Json(OkBody::new(history)))
}

pub async fn send(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<SendMessage>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let Json(body) = body?;
    let reply = state.chat.send(user.id(), body).await?;
    Ok(Json(OkBody::new(reply)))
}
