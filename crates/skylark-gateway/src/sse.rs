// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events streaming for POST /api/chat.
//!
//! SSE event format:
//! ```text
//! event: text_delta
//! data: {"text": "partial content here"}
//!
//! event: message_stop
//! data: {"chat_id": "..."}
//! ```
//!
//! Failures after streaming has begun arrive as an `error` event carrying a
//! generic caller-facing message; the upstream detail is logged only.

use axum::response::sse::{Event, Sse};
use futures::stream::{Stream, StreamExt};
use skylark_agent::{TurnEvent, TurnStream};
use skylark_core::{ProviderErrorKind, SkylarkError};
use tracing::warn;

/// Adapts a turn stream into an SSE response.
pub fn turn_stream_response(
    turn: TurnStream,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let events = turn.map(|item| {
        let event = match item {
            Ok(TurnEvent::TextDelta(text)) => Event::default()
                .event("text_delta")
                .data(serde_json::json!({ "text": text }).to_string()),
            Ok(TurnEvent::Completed { chat_id }) => Event::default()
                .event("message_stop")
                .data(serde_json::json!({ "chat_id": chat_id }).to_string()),
            Err(e) => {
                warn!(error = %e, "turn failed mid-stream");
                Event::default()
                    .event("error")
                    .data(serde_json::json!({ "error": user_message(&e) }).to_string())
            }
        };
        Ok(event)
    });
    Sse::new(events)
}

/// Caller-facing message for an error. Upstream detail never leaks.
pub fn user_message(error: &SkylarkError) -> String {
    match error {
        SkylarkError::Unauthorized => "unauthorized".to_string(),
        SkylarkError::MalformedInput(message)
        | SkylarkError::UnsupportedAttachmentShape(message) => message.clone(),
        SkylarkError::NotFound(what) => format!("{what} not found"),
        SkylarkError::Provider { message, .. } => {
            ProviderErrorKind::classify(message).user_message().to_string()
        }
        SkylarkError::Storage { .. }
        | SkylarkError::Config(_)
        | SkylarkError::Internal(_) => "something went wrong, please try again".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_quota_maps_to_try_again_later() {
        let err = SkylarkError::Provider {
            message: "quota exceeded for model".into(),
            source: None,
        };
        assert!(user_message(&err).contains("try again later"));
    }

    #[test]
    fn storage_errors_stay_generic() {
        let err = SkylarkError::Storage {
            source: "disk full, table chats corrupt".into(),
        };
        let message = user_message(&err);
        assert!(!message.contains("chats"));
        assert!(!message.contains("disk"));
    }
}
