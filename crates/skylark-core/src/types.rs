// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation, attachment, and tool-call data model shared across Skylark.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of a conversation message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A file attachment on a chat message.
///
/// Exactly one shape is populated by construction: either an opaque upload
/// identifier (inline reference) or a URL (absolute or site-relative).
/// Deserialization tries the inline shape first, matching the upstream
/// convention where a file id takes precedence over a URL when both appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attachment {
    /// Attachment passed by opaque upload identifier.
    Inline {
        #[serde(rename = "fileId")]
        file_id: String,
        /// Byte size when known; omitted from the provider request otherwise.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
    },
    /// Attachment passed by URL. Site-relative URLs must be absolutized
    /// before submission to a provider.
    Url { url: String },
}

/// Which attachment convention the active model provider consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentMode {
    /// The provider accepts opaque upload identifiers (file references).
    InlineReference,
    /// The provider accepts URLs only. Inline references must have been
    /// resolved to URLs by the blob store before reaching this layer.
    UrlReference,
}

/// A model-issued request to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call id. Assigned by the provider protocol when it has one,
    /// synthesized at the adapter boundary otherwise.
    pub id: String,
    /// Registered tool name.
    pub name: String,
    /// Argument object, to be validated against the tool's declared schema.
    pub arguments: serde_json::Value,
}

/// The answer to a [`ToolCall`]. Every call receives exactly one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: String,
    /// Result payload, JSON-encoded for the model.
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// A single message in a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    /// Textual content. May be empty when only attachments are present.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Tool invocations requested by an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For `role: tool` messages, the call id this message answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// A plain user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            attachments: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// A plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            attachments: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// An assistant message carrying tool invocations.
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            attachments: Vec::new(),
            tool_calls: calls,
            tool_call_id: None,
        }
    }

    /// A tool message answering the given call.
    pub fn tool_result(result: &ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: result.content.clone(),
            attachments: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: Some(result.call_id.clone()),
        }
    }

    /// True when the message carries no text, no attachments, and no tool
    /// plumbing. Such messages are dropped before provider submission.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.attachments.is_empty()
            && self.tool_calls.is_empty()
            && self.tool_call_id.is_none()
    }
}

/// Declared schema for a single tool, forwarded to the model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A provider-agnostic chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: Option<String>,
    /// Ordered, normalized, non-empty messages.
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSchema>,
    pub max_tokens: u32,
}

/// Token usage reported by a provider on completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events surfaced by a provider adapter while streaming a response.
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// Incremental text output.
    TextDelta(String),
    /// The model requests a tool invocation. Generation pauses until the
    /// orchestrator feeds back a [`ToolResult`] and resubmits.
    ToolCall(ToolCall),
    /// Generation finished.
    Completed {
        stop_reason: Option<String>,
        usage: Option<TokenUsage>,
    },
}

/// A passenger on a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Seat in `[row][A-F]` format, e.g. `12A`.
    pub seat: String,
}

/// Return leg of a round-trip reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnFlight {
    pub flight_number: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passengers: Vec<Passenger>,
}

/// Booked flight details, computed price included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetails {
    pub flight_number: String,
    pub date: String,
    pub passengers: Vec<Passenger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_flight: Option<ReturnFlight>,
    pub total_price_usd: u32,
}

/// A stored reservation, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: String,
    pub user_id: String,
    pub details: ReservationDetails,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A stored conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub user_id: String,
    pub messages: Vec<ChatMessage>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}
