// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for model backends (Gemini, OpenAI, mocks).

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::SkylarkError;
use crate::types::{AttachmentMode, ChatRequest, ProviderEvent};

/// A boxed stream of provider events.
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<ProviderEvent, SkylarkError>> + Send>>;

/// Adapter for a model provider backend.
///
/// A provider accepts a system prompt, an ordered message history, and the
/// tool schema catalog, and streams back text deltas interleaved with
/// tool-call directives, terminated by a completion event.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider name, used in logs and config resolution.
    fn name(&self) -> &str;

    /// Which attachment convention this provider consumes. The attachment
    /// normalizer shapes every message accordingly before submission.
    fn attachment_mode(&self) -> AttachmentMode;

    /// Starts a streaming chat completion for the given request.
    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, SkylarkError>;
}
