use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use companion_chat_service::{AddNote, SearchMemory};

use crate::AppState;
use crate::api_error::ApiError;
use crate::current_user::CurrentUser;
use crate::response_types::{NoteAddedResponse, OkBody, SearchResponse};

pub async fn add(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<AddNote>, JsonRejection>,
) -> Result<Json<NoteAddedResponse>, ApiError> {
    let Json(body) = body?;
    let added = state.memory.add_note(user.id(), body).await?;
    Ok(Json(OkBody::new(added)))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<SearchMemory>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(body) = body?;
    let items = state.memory.search(user.id(), body).await?;
    Ok(Json(SearchResponse { ok: true, items }))
}
