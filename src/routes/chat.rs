use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;

use crate::{
    error::AppError,
    message::ChatRequest,
    services::relay::complete_conversation,
    state::SharedState,
};

// The body is read as JSON whatever the Content-Type header says.
pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let payload: ChatRequest = serde_json::from_slice(&body)?;
    let reply = complete_conversation(&state.completion, payload.messages).await?;
    Ok(Json(reply))
}
