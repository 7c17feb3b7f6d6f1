// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for Skylark.
//!
//! Speaks the chat completions SSE protocol and consumes attachments as
//! **URL references** (`image_url` content parts). Tool-call arguments
//! arrive as JSON fragments keyed by index and are accumulated before a
//! [`ProviderEvent::ToolCall`] is emitted.

pub mod client;
pub mod sse;
pub mod types;

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use async_trait::async_trait;
use futures::Stream;
use skylark_core::types::{
    Attachment, AttachmentMode, ChatRequest, ProviderEvent, Role, TokenUsage, ToolCall,
};
use skylark_core::{EventStream, ProviderAdapter, SkylarkError};

use crate::client::OpenAiClient;
use crate::types::{
    ChatCompletionChunk, ChatCompletionRequest, ContentPart, ImageUrl, StreamOptions,
    WireContent, WireFunctionCall, WireFunctionDef, WireMessage, WireTool, WireToolCall,
};

/// OpenAI model provider.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider for the given API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self, SkylarkError> {
        Ok(Self {
            client: OpenAiClient::new(api_key, model)?,
        })
    }

    /// Wraps an existing client (used by tests to point at a mock server).
    pub fn from_client(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn attachment_mode(&self) -> AttachmentMode {
        AttachmentMode::UrlReference
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, SkylarkError> {
        let wire = to_wire_request(self.client.model(), &request)?;
        let chunks = self.client.stream_chat_completion(&wire).await?;
        Ok(Box::pin(OpenAiEventStream::new(chunks)))
    }
}

/// Converts the provider-agnostic request into the chat completions wire shape.
fn to_wire_request(
    model: &str,
    request: &ChatRequest,
) -> Result<ChatCompletionRequest, SkylarkError> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(prompt) = &request.system_prompt {
        messages.push(WireMessage {
            role: "system".into(),
            content: Some(WireContent::Text(prompt.clone())),
            tool_calls: vec![],
            tool_call_id: None,
        });
    }

    for message in &request.messages {
        let wire = match message.role {
            Role::User => WireMessage {
                role: "user".into(),
                content: Some(user_content(message)?),
                tool_calls: vec![],
                tool_call_id: None,
            },
            Role::Assistant => WireMessage {
                role: "assistant".into(),
                content: if message.content.is_empty() {
                    None
                } else {
                    Some(WireContent::Text(message.content.clone()))
                },
                tool_calls: message
                    .tool_calls
                    .iter()
                    .map(|call| WireToolCall {
                        id: call.id.clone(),
                        call_type: "function".into(),
                        function: WireFunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.to_string(),
                        },
                    })
                    .collect(),
                tool_call_id: None,
            },
            Role::Tool => WireMessage {
                role: "tool".into(),
                content: Some(WireContent::Text(message.content.clone())),
                tool_calls: vec![],
                tool_call_id: Some(message.tool_call_id.clone().ok_or_else(|| {
                    SkylarkError::MalformedInput("tool message without a call id".into())
                })?),
            },
        };
        messages.push(wire);
    }

    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(
            request
                .tools
                .iter()
                .map(|t| WireTool {
                    tool_type: "function".into(),
                    function: WireFunctionDef {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    },
                })
                .collect(),
        )
    };

    Ok(ChatCompletionRequest {
        model: model.to_string(),
        messages,
        tools,
        max_tokens: request.max_tokens,
        stream: true,
        stream_options: Some(StreamOptions {
            include_usage: true,
        }),
    })
}

/// Shapes a user message's text + attachments as wire content.
///
/// Inline references cannot be expressed in this protocol; the normalizer is
/// responsible for resolving them before submission, so one arriving here is
/// rejected rather than silently dropped.
fn user_content(
    message: &skylark_core::types::ChatMessage,
) -> Result<WireContent, SkylarkError> {
    if message.attachments.is_empty() {
        return Ok(WireContent::Text(message.content.clone()));
    }

    let mut parts = Vec::with_capacity(message.attachments.len() + 1);
    if !message.content.is_empty() {
        parts.push(ContentPart::Text {
            text: message.content.clone(),
        });
    }
    for attachment in &message.attachments {
        match attachment {
            Attachment::Url { url } => parts.push(ContentPart::ImageUrl {
                image_url: ImageUrl { url: url.clone() },
            }),
            Attachment::Inline { file_id, .. } => {
                return Err(SkylarkError::UnsupportedAttachmentShape(format!(
                    "inline reference {file_id} reached a URL-reference provider"
                )));
            }
        }
    }
    Ok(WireContent::Parts(parts))
}

/// In-progress tool call assembled from streamed fragments.
#[derive(Default)]
struct ToolCallBuilder {
    id: Option<String>,
    name: String,
    arguments: String,
}

impl ToolCallBuilder {
    fn finish(self) -> ToolCall {
        let arguments = if self.arguments.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&self.arguments)
                .unwrap_or(serde_json::Value::String(self.arguments))
        };
        ToolCall {
            id: self
                .id
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4())),
            name: self.name,
            arguments,
        }
    }
}

/// Adapts the chunk stream into [`ProviderEvent`]s.
///
/// Tool-call fragments accumulate per index and flush when the choice
/// reports a finish reason (or the stream ends); a final `Completed` event
/// follows once the underlying stream is exhausted.
struct OpenAiEventStream {
    inner: Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, SkylarkError>> + Send>>,
    pending: VecDeque<ProviderEvent>,
    builders: Vec<ToolCallBuilder>,
    stop_reason: Option<String>,
    usage: Option<TokenUsage>,
    done: bool,
}

impl OpenAiEventStream {
    fn new(
        inner: Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, SkylarkError>> + Send>>,
    ) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            builders: Vec::new(),
            stop_reason: None,
            usage: None,
            done: false,
        }
    }

    fn ingest(&mut self, chunk: ChatCompletionChunk) {
        if let Some(usage) = chunk.usage {
            self.usage = Some(TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            });
        }
        for choice in chunk.choices {
            if let Some(text) = choice.delta.content {
                if !text.is_empty() {
                    self.pending.push_back(ProviderEvent::TextDelta(text));
                }
            }
            for fragment in choice.delta.tool_calls {
                if self.builders.len() <= fragment.index {
                    self.builders
                        .resize_with(fragment.index + 1, ToolCallBuilder::default);
                }
                let builder = &mut self.builders[fragment.index];
                if let Some(id) = fragment.id {
                    builder.id = Some(id);
                }
                if let Some(function) = fragment.function {
                    if let Some(name) = function.name {
                        builder.name.push_str(&name);
                    }
                    if let Some(arguments) = function.arguments {
                        builder.arguments.push_str(&arguments);
                    }
                }
            }
            if let Some(reason) = choice.finish_reason {
                self.stop_reason = Some(reason);
                self.flush_tool_calls();
            }
        }
    }

    fn flush_tool_calls(&mut self) {
        for builder in self.builders.drain(..) {
            self.pending
                .push_back(ProviderEvent::ToolCall(builder.finish()));
        }
    }
}

impl Stream for OpenAiEventStream {
    type Item = Result<ProviderEvent, SkylarkError>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut TaskContext<'_>,
    ) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            if this.done {
                return Poll::Ready(None);
            }
            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => this.ingest(chunk),
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    this.flush_tool_calls();
                    this.pending.push_back(ProviderEvent::Completed {
                        stop_reason: this.stop_reason.take(),
                        usage: this.usage.take(),
                    });
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
