// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-scripted rounds,
//! enabling fast, CI-runnable tests without external API calls. Each call to
//! `stream_chat` consumes one round from a FIFO queue and records the
//! submitted request for later assertions.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use skylark_core::types::{
    AttachmentMode, ChatRequest, ProviderEvent, TokenUsage, ToolCall,
};
use skylark_core::{EventStream, ProviderAdapter, SkylarkError};

/// One scripted provider round.
pub enum MockRound {
    /// Events streamed for this round, in order.
    Events(Vec<ProviderEvent>),
    /// `stream_chat` fails outright with this provider error message.
    Error(String),
}

/// A mock provider that replays scripted rounds.
///
/// When the queue is empty, a default round streaming "mock response" is
/// produced.
pub struct MockProvider {
    mode: AttachmentMode,
    rounds: Mutex<VecDeque<MockRound>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Creates a mock provider with an empty script queue.
    pub fn new(mode: AttachmentMode) -> Self {
        Self {
            mode,
            rounds: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Scripts a round that streams the given text and completes.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.push_round(MockRound::Events(vec![
            ProviderEvent::TextDelta(text.into()),
            ProviderEvent::Completed {
                stop_reason: Some("stop".into()),
                usage: Some(TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                }),
            },
        ]))
        .await;
    }

    /// Scripts a round that requests the given tool call and completes.
    pub async fn push_tool_call(&self, call: ToolCall) {
        self.push_round(MockRound::Events(vec![
            ProviderEvent::ToolCall(call),
            ProviderEvent::Completed {
                stop_reason: Some("tool_calls".into()),
                usage: None,
            },
        ]))
        .await;
    }

    /// Scripts a provider-level failure.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.push_round(MockRound::Error(message.into())).await;
    }

    /// Appends a fully custom round.
    pub async fn push_round(&self, round: MockRound) {
        self.rounds.lock().await.push_back(round);
    }

    /// Requests submitted so far, in order.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn attachment_mode(&self) -> AttachmentMode {
        self.mode
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, SkylarkError> {
        self.requests.lock().await.push(request);

        let round = self.rounds.lock().await.pop_front();
        let events = match round {
            Some(MockRound::Error(message)) => {
                return Err(SkylarkError::Provider {
                    message,
                    source: None,
                });
            }
            Some(MockRound::Events(events)) => events,
            None => vec![
                ProviderEvent::TextDelta("mock response".into()),
                ProviderEvent::Completed {
                    stop_reason: Some("stop".into()),
                    usage: None,
                },
            ],
        };

        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }
}
