// src/services/relay.rs
use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::message::ChatMessage;
use crate::services::completion::CompletionClient;

pub const RELAY_SYSTEM_PROMPT: &str = "You are a helpful assistant for a couples counseling app. Your responses should be supportive and constructive.";

/// Fixed system instruction followed by the caller's messages, order untouched.
pub fn provider_messages(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(ChatMessage::system(RELAY_SYSTEM_PROMPT));
    out.extend(messages);
    out
}

/// Completes a conversation. Nothing is retained between calls.
pub async fn complete_conversation(
    client: &CompletionClient,
    messages: Option<Vec<ChatMessage>>,
) -> Result<Value, AppError> {
    let messages = match messages {
        Some(m) if !m.is_empty() => m,
        _ => return Err(AppError::BadRequest("No messages provided".to_string())),
    };

    info!(count = messages.len(), "relaying conversation");
    let outgoing = provider_messages(messages);
    Ok(client.complete(&outgoing).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn system_prompt_is_prepended_in_order() {
        let input = vec![
            ChatMessage::new(Role::System, "counselor"),
            ChatMessage::new(Role::User, "a"),
            ChatMessage::new(Role::User, "a"),
            ChatMessage::new(Role::Assistant, "b"),
        ];
        let out = provider_messages(input.clone());
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], ChatMessage::system(RELAY_SYSTEM_PROMPT));
        assert_eq!(&out[1..], input.as_slice());
    }

    #[tokio::test]
    async fn empty_list_is_a_bad_request() {
        // Unroutable; a provider call here would surface as Upstream.
        let client = CompletionClient::with_base_url("http://127.0.0.1:9", "k");
        let err = complete_conversation(&client, Some(vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = complete_conversation(&client, None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
