// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /api/chat (streamed turn), DELETE /api/chat, POST
//! /api/files/upload, and GET /health.

use axum::{
    Json,
    extract::{Extension, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use skylark_core::types::ChatMessage;
use skylark_core::{SkylarkError, TranscriptStore};

use crate::auth::AuthenticatedUser;
use crate::server::AppState;
use crate::sse;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    /// Conversation id. Absent for a new conversation.
    #[serde(default)]
    pub id: Option<String>,
    /// Ordered message history including the new user message(s).
    pub messages: Vec<ChatMessage>,
}

/// Query parameters for DELETE /api/chat.
#[derive(Debug, Deserialize)]
pub struct DeleteChatParams {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response body for POST /api/files/upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Site-relative URL of the stored file.
    pub url: String,
    pub pathname: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub size: usize,
    /// Upload id for providers that take inline references.
    #[serde(rename = "fileId")]
    pub file_id: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps an error to its HTTP response, logging the full detail.
pub fn error_response(error: SkylarkError) -> Response {
    let status =
        StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(error = %error, "request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: sse::user_message(&error),
        }),
    )
        .into_response()
}

/// POST /api/chat
///
/// Runs one conversation turn and streams the assistant response as SSE.
pub async fn post_chat(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    body: Result<Json<ChatTurnRequest>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(SkylarkError::MalformedInput(rejection.body_text()));
        }
    };

    match state
        .orchestrator
        .process_turn(Some(user_id), body.id, body.messages)
        .await
    {
        Ok((_chat_id, turn)) => sse::turn_stream_response(turn).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/chat?id=...
///
/// Deletes a conversation owned by the caller.
pub async fn delete_chat(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Query(params): Query<DeleteChatParams>,
) -> Response {
    let Some(chat_id) = params.id else {
        return error_response(SkylarkError::MalformedInput("missing chat id".into()));
    };

    let chat = match state.transcripts.get_chat(&chat_id).await {
        Ok(chat) => chat,
        Err(e) => return error_response(e),
    };

    // A chat owned by another user is indistinguishable from a missing one.
    match chat {
        Some(record) if record.user_id == user_id => {}
        _ => return error_response(SkylarkError::NotFound("chat".into())),
    }

    match state.transcripts.delete_chat(&chat_id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/files/upload
///
/// Accepts a multipart `file` field, enforces the blob-store constraints
/// (5 MiB max, images and PDFs only), stores the bytes under the upload
/// directory, and returns both a site-relative URL and an upload id so
/// either provider convention can consume the file.
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(_user_id)): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Response {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return error_response(SkylarkError::MalformedInput(
                    "no file uploaded".into(),
                ));
            }
            Err(e) => {
                return error_response(SkylarkError::MalformedInput(e.to_string()));
            }
        }
    };

    let content_type = field.content_type().unwrap_or("").to_string();
    if !(content_type.starts_with("image/") || content_type == "application/pdf") {
        return error_response(SkylarkError::MalformedInput(
            "file type should be an image or PDF".into(),
        ));
    }

    let extension = field
        .file_name()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return error_response(SkylarkError::MalformedInput(e.to_string())),
    };
    if bytes.len() > MAX_UPLOAD_BYTES {
        return error_response(SkylarkError::MalformedInput(
            "file size should be less than 5 MiB".into(),
        ));
    }

    let file_name = format!("{}.{extension}", uuid::Uuid::new_v4());
    let path = state.uploads_dir.join(&file_name);
    if let Err(e) = tokio::fs::create_dir_all(&state.uploads_dir).await {
        warn!(error = %e, "failed to create upload directory");
        return error_response(SkylarkError::Internal(e.to_string()));
    }
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        warn!(error = %e, "failed to write upload");
        return error_response(SkylarkError::Internal(e.to_string()));
    }

    let url = format!("/uploads/{file_name}");
    (
        StatusCode::OK,
        Json(UploadResponse {
            pathname: url.clone(),
            file_id: url.clone(),
            url,
            content_type,
            size: bytes.len(),
        }),
    )
        .into_response()
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_turn_request_deserializes_without_id() {
        let json = r#"{"messages": [{"role": "user", "content": "hi"}]}"#;
        let req: ChatTurnRequest = serde_json::from_str(json).unwrap();
        assert!(req.id.is_none());
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn chat_turn_request_deserializes_with_attachments() {
        let json = r#"{
            "id": "chat-1",
            "messages": [{
                "role": "user",
                "content": "",
                "attachments": [{"url": "/uploads/a.png"}]
            }]
        }"#;
        let req: ChatTurnRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id.as_deref(), Some("chat-1"));
        assert_eq!(req.messages[0].attachments.len(), 1);
    }

    #[test]
    fn upload_response_uses_wire_field_names() {
        let resp = UploadResponse {
            url: "/uploads/a.png".into(),
            pathname: "/uploads/a.png".into(),
            content_type: "image/png".into(),
            size: 42,
            file_id: "/uploads/a.png".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["contentType"], "image/png");
        assert_eq!(json["fileId"], "/uploads/a.png");
    }
}
