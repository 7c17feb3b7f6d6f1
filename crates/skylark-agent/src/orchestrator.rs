// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator.
//!
//! Drives one turn: validates the caller, normalizes attachments, submits
//! history + tool schemas to the provider, executes requested tool calls one
//! at a time as they arrive, feeds results back until the model completes
//! without further calls, streams text deltas to the caller, and persists
//! the transcript once at the end.
//!
//! Persistence failure after a successful response is logged and swallowed;
//! the caller has already received their answer. A dropped caller cancels
//! generation and skips persistence entirely.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use skylark_core::types::{
    ChatMessage, ChatRequest, ProviderEvent, ToolCall, ToolSchema,
};
use skylark_core::{ProviderAdapter, ReservationStore, SkylarkError, TranscriptStore};
use skylark_tools::{PaymentLedger, ToolContext, ToolRegistry};

use crate::normalize;

/// Booking-assistant system prompt, following the original assistant flow.
const SYSTEM_PROMPT: &str = "\
- you help users book flights!
- keep your responses limited to a sentence.
- DO NOT output lists.
- after every tool call, pretend you're showing the result to the user and keep your response limited to a phrase.
- ask follow up questions to nudge user into the optimal flow
- ask for any details you don't know, like name of passenger, etc.
- C and D are aisle seats, A and F are window seats, B and E are middle seats
- assume the most popular airports for the origin and destination
- here's the optimal flow
  - search for flights
  - choose flight
  - select seats
  - create reservation (ask user whether to proceed with payment or change reservation)
  - authorize payment (requires user consent, wait for user to finish payment and let you know when done)
  - display boarding pass (DO NOT display boarding pass without verifying payment)";

/// Buffered events between the turn task and the caller. A small buffer
/// keeps backpressure: when the caller stops reading, the task blocks and
/// eventually observes the disconnect.
const CHANNEL_CAPACITY: usize = 8;

/// Caller-visible events of a processed turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// Incremental assistant text.
    TextDelta(String),
    /// The turn finished; all text has been streamed.
    Completed { chat_id: String },
}

/// Stream of turn events delivered to the caller.
pub type TurnStream = Pin<Box<dyn Stream<Item = Result<TurnEvent, SkylarkError>> + Send>>;

/// Settings for the orchestrator, resolved from configuration at startup.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Public base URL used to absolutize site-relative attachment URLs.
    pub base_url: String,
    /// System prompt override. Falls back to the built-in booking prompt.
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
}

/// Orchestrates conversation turns against a provider and the tool registry.
pub struct Orchestrator {
    provider: Arc<dyn ProviderAdapter>,
    tools: Arc<ToolRegistry>,
    transcripts: Arc<dyn TranscriptStore>,
    reservations: Arc<dyn ReservationStore>,
    payments: Arc<PaymentLedger>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        tools: Arc<ToolRegistry>,
        transcripts: Arc<dyn TranscriptStore>,
        reservations: Arc<dyn ReservationStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            provider,
            tools,
            transcripts,
            reservations,
            payments: Arc::new(PaymentLedger::new()),
            settings,
        }
    }

    /// Processes one conversation turn.
    ///
    /// Returns the chat id (newly assigned when absent) and the event
    /// stream. Failures before the first provider byte -- missing identity,
    /// malformed attachments, a rejected provider request -- surface as an
    /// `Err` so the HTTP layer can map them to a status code; later failures
    /// arrive in-band on the stream.
    pub async fn process_turn(
        &self,
        user_id: Option<String>,
        chat_id: Option<String>,
        messages: Vec<ChatMessage>,
    ) -> Result<(String, TurnStream), SkylarkError> {
        let Some(user_id) = user_id else {
            return Err(SkylarkError::Unauthorized);
        };

        let chat_id = chat_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let history = normalize::normalize_messages(
            messages,
            self.provider.attachment_mode(),
            &self.settings.base_url,
        )?;

        debug!(chat_id = %chat_id, message_count = history.len(), "turn accepted");

        // First provider round happens before streaming starts, so request
        // rejections (quota, permission) become turn-ending errors with a
        // proper status and no partial persistence.
        let request = self.build_request(history.clone());
        let first_round = self.provider.stream_chat(request).await?;

        let (tx, rx) = mpsc::channel::<Result<TurnEvent, SkylarkError>>(CHANNEL_CAPACITY);

        let task = TurnTask {
            provider: self.provider.clone(),
            tools: self.tools.clone(),
            transcripts: self.transcripts.clone(),
            tool_ctx: ToolContext {
                user_id: Some(user_id.clone()),
                reservations: self.reservations.clone(),
                payments: self.payments.clone(),
            },
            settings: self.settings.clone(),
            chat_id: chat_id.clone(),
            user_id,
        };
        tokio::spawn(task.run(history, first_round, tx));

        let mut rx = rx;
        let stream = futures::stream::poll_fn(move |cx| rx.poll_recv(cx));
        Ok((chat_id, Box::pin(stream)))
    }

    fn build_request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        build_request(&self.settings, self.tools.tool_schemas(), messages)
    }
}

fn build_request(
    settings: &OrchestratorSettings,
    tools: Vec<ToolSchema>,
    messages: Vec<ChatMessage>,
) -> ChatRequest {
    let prompt = settings
        .system_prompt
        .clone()
        .unwrap_or_else(|| {
            format!(
                "{SYSTEM_PROMPT}\n- today's date is {}.",
                chrono::Utc::now().format("%Y-%m-%d")
            )
        });
    ChatRequest {
        system_prompt: Some(prompt),
        messages,
        tools,
        max_tokens: settings.max_tokens,
    }
}

/// State moved into the spawned per-turn task.
struct TurnTask {
    provider: Arc<dyn ProviderAdapter>,
    tools: Arc<ToolRegistry>,
    transcripts: Arc<dyn TranscriptStore>,
    tool_ctx: ToolContext,
    settings: OrchestratorSettings,
    chat_id: String,
    user_id: String,
}

impl TurnTask {
    async fn run(
        self,
        history: Vec<ChatMessage>,
        first_round: skylark_core::EventStream,
        tx: mpsc::Sender<Result<TurnEvent, SkylarkError>>,
    ) {
        let mut working = history.clone();
        let mut new_messages: Vec<ChatMessage> = Vec::new();
        let mut stream = first_round;

        let final_text = loop {
            let mut round_text = String::new();
            let mut round_calls: Vec<ToolCall> = Vec::new();

            while let Some(event) = stream.next().await {
                match event {
                    Ok(ProviderEvent::TextDelta(delta)) => {
                        round_text.push_str(&delta);
                        if tx.send(Ok(TurnEvent::TextDelta(delta))).await.is_err() {
                            debug!(chat_id = %self.chat_id, "caller disconnected, cancelling turn");
                            return;
                        }
                    }
                    Ok(ProviderEvent::ToolCall(call)) => {
                        round_calls.push(call);
                    }
                    Ok(ProviderEvent::Completed { stop_reason, .. }) => {
                        debug!(
                            chat_id = %self.chat_id,
                            stop_reason = stop_reason.as_deref().unwrap_or(""),
                            tool_calls = round_calls.len(),
                            "provider round complete"
                        );
                        break;
                    }
                    Err(e) => {
                        warn!(chat_id = %self.chat_id, error = %e, "provider stream failed");
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }

            if round_calls.is_empty() {
                break round_text;
            }

            // Record the assistant message that carried the calls, then
            // answer each call in arrival order -- every call gets exactly
            // one result before the next round.
            let mut call_message = ChatMessage::assistant_tool_calls(round_calls.clone());
            call_message.content = round_text;
            working.push(call_message.clone());
            new_messages.push(call_message);

            for call in round_calls {
                info!(chat_id = %self.chat_id, tool = %call.name, "executing tool call");
                let result = self.tools.dispatch(&call, &self.tool_ctx).await;
                let message = ChatMessage::tool_result(&result);
                working.push(message.clone());
                new_messages.push(message);
            }

            let request = build_request(
                &self.settings,
                self.tools.tool_schemas(),
                working.clone(),
            );
            match self.provider.stream_chat(request).await {
                Ok(next) => stream = next,
                Err(e) => {
                    warn!(chat_id = %self.chat_id, error = %e, "provider resubmission failed");
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        };

        // Persist exactly once per completed turn: input history, tool
        // traffic, and the final assistant message. Storage failure must not
        // fail a turn the caller already received.
        let mut transcript = history;
        transcript.extend(new_messages);
        if !final_text.is_empty() {
            transcript.push(ChatMessage::assistant(final_text));
        }
        if let Err(e) = self
            .transcripts
            .append_transcript(&self.chat_id, &self.user_id, &transcript)
            .await
        {
            warn!(chat_id = %self.chat_id, error = %e, "failed to persist transcript");
        }

        let _ = tx
            .send(Ok(TurnEvent::Completed {
                chat_id: self.chat_id.clone(),
            }))
            .await;
    }
}
