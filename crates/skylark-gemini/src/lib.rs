// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini provider adapter for Skylark.
//!
//! Speaks the `streamGenerateContent` SSE protocol and consumes attachments
//! as **inline file references** (`fileData` parts). The Gemini protocol
//! carries no tool-call id, so this adapter synthesizes one per function
//! call; the orchestrator's call/result pairing relies on it.

pub mod client;
pub mod sse;
pub mod types;

use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use async_trait::async_trait;
use futures::Stream;
use skylark_core::types::{
    Attachment, AttachmentMode, ChatRequest, ProviderEvent, Role, TokenUsage, ToolCall,
};
use skylark_core::{EventStream, ProviderAdapter, SkylarkError};

use crate::client::GeminiClient;
use crate::types::{
    Content, FileData, FunctionCall, FunctionDeclaration, FunctionResponse,
    GenerateContentChunk, GenerateContentRequest, GenerationConfig, Part, ToolDeclarations,
};

/// Gemini model provider.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider for the given API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self, SkylarkError> {
        Ok(Self {
            client: GeminiClient::new(api_key, model)?,
        })
    }

    /// Wraps an existing client (used by tests to point at a mock server).
    pub fn from_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn attachment_mode(&self) -> AttachmentMode {
        AttachmentMode::InlineReference
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, SkylarkError> {
        let wire = to_wire_request(&request)?;
        let chunks = self.client.stream_generate_content(&wire).await?;
        Ok(Box::pin(GeminiEventStream::new(chunks)))
    }
}

/// Converts the provider-agnostic request into the Gemini wire shape.
fn to_wire_request(request: &ChatRequest) -> Result<GenerateContentRequest, SkylarkError> {
    // Function responses are keyed by name on the wire, while tool messages
    // carry only the call id. Recover names from earlier assistant calls.
    let mut call_names: HashMap<&str, &str> = HashMap::new();
    for message in &request.messages {
        for call in &message.tool_calls {
            call_names.insert(call.id.as_str(), call.name.as_str());
        }
    }

    let mut contents = Vec::with_capacity(request.messages.len());
    for message in &request.messages {
        let mut parts = Vec::new();

        match message.role {
            Role::User | Role::Assistant => {
                if !message.content.is_empty() {
                    parts.push(Part::Text {
                        text: message.content.clone(),
                    });
                }
                for attachment in &message.attachments {
                    parts.push(attachment_part(attachment));
                }
                for call in &message.tool_calls {
                    parts.push(Part::FunctionCall {
                        function_call: FunctionCall {
                            name: call.name.clone(),
                            args: call.arguments.clone(),
                        },
                    });
                }
            }
            Role::Tool => {
                let call_id = message.tool_call_id.as_deref().ok_or_else(|| {
                    SkylarkError::MalformedInput("tool message without a call id".into())
                })?;
                let name = call_names.get(call_id).copied().ok_or_else(|| {
                    SkylarkError::MalformedInput(format!(
                        "tool message answers unknown call {call_id}"
                    ))
                })?;
                parts.push(Part::FunctionResponse {
                    function_response: FunctionResponse {
                        name: name.to_string(),
                        response: result_payload(&message.content),
                    },
                });
            }
        }

        if parts.is_empty() {
            continue;
        }

        let role = match message.role {
            Role::User | Role::Tool => "user",
            Role::Assistant => "model",
        };
        contents.push(Content {
            role: Some(role.to_string()),
            parts,
        });
    }

    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(vec![ToolDeclarations {
            function_declarations: request
                .tools
                .iter()
                .map(|t| FunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                })
                .collect(),
        }])
    };

    Ok(GenerateContentRequest {
        system_instruction: request.system_prompt.as_ref().map(|prompt| Content {
            role: None,
            parts: vec![Part::Text {
                text: prompt.clone(),
            }],
        }),
        contents,
        tools,
        generation_config: Some(GenerationConfig {
            max_output_tokens: request.max_tokens,
        }),
    })
}

/// Maps a normalized attachment to a `fileData` part. Both shapes reach this
/// provider: inline upload ids pass through as URIs, URL references arrive
/// already absolutized.
fn attachment_part(attachment: &Attachment) -> Part {
    let reference = match attachment {
        Attachment::Inline { file_id, .. } => file_id.as_str(),
        Attachment::Url { url } => url.as_str(),
    };
    Part::FileData {
        file_data: FileData {
            mime_type: mime_type_for(reference).to_string(),
            file_uri: reference.to_string(),
        },
    }
}

/// Guesses a MIME type from the reference extension. The blob store only
/// accepts images and PDFs, so the fallback is a generic image type.
fn mime_type_for(reference: &str) -> &'static str {
    let lower = reference.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// Wraps a tool result string into the object shape the wire format requires.
fn result_payload(content: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value) if value.is_object() => value,
        Ok(value) => serde_json::json!({ "result": value }),
        Err(_) => serde_json::json!({ "result": content }),
    }
}

/// Adapts the chunk stream into [`ProviderEvent`]s, emitting a final
/// `Completed` event once the underlying stream ends.
struct GeminiEventStream {
    inner: Pin<Box<dyn Stream<Item = Result<GenerateContentChunk, SkylarkError>> + Send>>,
    pending: VecDeque<ProviderEvent>,
    stop_reason: Option<String>,
    usage: Option<TokenUsage>,
    done: bool,
}

impl GeminiEventStream {
    fn new(
        inner: Pin<Box<dyn Stream<Item = Result<GenerateContentChunk, SkylarkError>> + Send>>,
    ) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            stop_reason: None,
            usage: None,
            done: false,
        }
    }

    fn ingest(&mut self, chunk: GenerateContentChunk) {
        if let Some(usage) = chunk.usage_metadata {
            self.usage = Some(TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            });
        }
        let Some(candidate) = chunk.candidates.into_iter().next() else {
            return;
        };
        if let Some(reason) = candidate.finish_reason {
            self.stop_reason = Some(reason);
        }
        let Some(content) = candidate.content else {
            return;
        };
        for part in content.parts {
            match part {
                Part::Text { text } => {
                    if !text.is_empty() {
                        self.pending.push_back(ProviderEvent::TextDelta(text));
                    }
                }
                Part::FunctionCall { function_call } => {
                    // No call id on the wire; synthesize one so the
                    // orchestrator can pair the result back.
                    self.pending.push_back(ProviderEvent::ToolCall(ToolCall {
                        id: format!("call_{}", uuid::Uuid::new_v4()),
                        name: function_call.name,
                        arguments: function_call.args,
                    }));
                }
                Part::FileData { .. } | Part::FunctionResponse { .. } => {}
            }
        }
    }
}

impl Stream for GeminiEventStream {
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

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use skylark_core::types::{ChatMessage, ToolResult, ToolSchema};

    fn request_with(messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            system_prompt: Some("You help users book flights.".into()),
            messages,
            tools: vec![ToolSchema {
                name: "findFlights".into(),
                description: "Searches for flights".into(),
                parameters: serde_json::json!({"type": "object"}),
            }],
            max_tokens: 1024,
        }
    }

    #[test]
    fn wire_request_maps_roles_and_system_prompt() {
        let request = request_with(vec![
            ChatMessage::user("find flights"),
            ChatMessage::assistant("sure"),
        ]);
        let wire = to_wire_request(&request).unwrap();

        assert!(wire.system_instruction.is_some());
        assert_eq!(wire.contents.len(), 2);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
        assert_eq!(wire.contents[1].role.as_deref(), Some("model"));
        assert!(wire.tools.is_some());
        assert_eq!(
            wire.generation_config.as_ref().unwrap().max_output_tokens,
            1024
        );
    }

    #[test]
    fn wire_request_maps_attachments_to_file_data() {
        let mut msg = ChatMessage::user("what is in this file?");
        msg.attachments = vec![
            Attachment::Inline {
                file_id: "/uploads/scan.pdf".into(),
                size: Some(2048),
            },
            Attachment::Url {
                url: "https://app.example/uploads/a.png".into(),
            },
        ];
        let wire = to_wire_request(&request_with(vec![msg])).unwrap();

        let parts = &wire.contents[0].parts;
        assert_eq!(parts.len(), 3);
        match &parts[1] {
            Part::FileData { file_data } => {
                assert_eq!(file_data.file_uri, "/uploads/scan.pdf");
                assert_eq!(file_data.mime_type, "application/pdf");
            }
            other => panic!("expected FileData, got {other:?}"),
        }
        match &parts[2] {
            Part::FileData { file_data } => {
                assert_eq!(file_data.mime_type, "image/png");
            }
            other => panic!("expected FileData, got {other:?}"),
        }
    }

    #[test]
    fn wire_request_pairs_tool_results_by_call_id() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "findFlights".into(),
            arguments: serde_json::json!({"origin": "JFK"}),
        };
        let result = ToolResult {
            call_id: "call_1".into(),
            content: r#"{"flights": []}"#.into(),
            is_error: false,
        };
        let request = request_with(vec![
            ChatMessage::user("find flights"),
            ChatMessage::assistant_tool_calls(vec![call]),
            ChatMessage::tool_result(&result),
        ]);
        let wire = to_wire_request(&request).unwrap();

        assert_eq!(wire.contents.len(), 3);
        match &wire.contents[1].parts[0] {
            Part::FunctionCall { function_call } => {
                assert_eq!(function_call.name, "findFlights");
            }
            other => panic!("expected FunctionCall, got {other:?}"),
        }
        assert_eq!(wire.contents[2].role.as_deref(), Some("user"));
        match &wire.contents[2].parts[0] {
            Part::FunctionResponse { function_response } => {
                assert_eq!(function_response.name, "findFlights");
                assert!(function_response.response["flights"].is_array());
            }
            other => panic!("expected FunctionResponse, got {other:?}"),
        }
    }

    #[test]
    fn wire_request_rejects_orphan_tool_message() {
        let result = ToolResult {
            call_id: "call_missing".into(),
            content: "{}".into(),
            is_error: false,
        };
        let request = request_with(vec![ChatMessage::tool_result(&result)]);
        let err = to_wire_request(&request).unwrap_err();
        assert!(matches!(err, SkylarkError::MalformedInput(_)));
    }

    #[test]
    fn non_object_tool_result_is_wrapped() {
        assert_eq!(
            result_payload("plain text"),
            serde_json::json!({"result": "plain text"})
        );
        assert_eq!(
            result_payload("[1, 2]"),
            serde_json::json!({"result": [1, 2]})
        );
        assert_eq!(
            result_payload(r#"{"ok": true}"#),
            serde_json::json!({"ok": true})
        );
    }

    #[tokio::test]
    async fn event_stream_emits_deltas_calls_and_completion() {
        let chunks: Vec<Result<GenerateContentChunk, SkylarkError>> = vec![
            Ok(serde_json::from_str(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"One moment"}]}}]}"#,
            )
            .unwrap()),
            Ok(serde_json::from_str(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"functionCall":{"name":"findFlights","args":{"origin":"JFK"}}}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":4}}"#,
            )
            .unwrap()),
        ];
        let mut stream =
            GeminiEventStream::new(Box::pin(futures::stream::iter(chunks)));

        match stream.next().await.unwrap().unwrap() {
            ProviderEvent::TextDelta(text) => assert_eq!(text, "One moment"),
            other => panic!("expected TextDelta, got {other:?}"),
        }
        let call = match stream.next().await.unwrap().unwrap() {
            ProviderEvent::ToolCall(call) => call,
            other => panic!("expected ToolCall, got {other:?}"),
        };
        assert_eq!(call.name, "findFlights");
        assert!(call.id.starts_with("call_"), "synthesized id: {}", call.id);
        match stream.next().await.unwrap().unwrap() {
            ProviderEvent::Completed { stop_reason, usage } => {
                assert_eq!(stop_reason.as_deref(), Some("STOP"));
                assert_eq!(usage.unwrap().output_tokens, 4);
            }
            other => panic!("expected Completed, got {other:?}"),
        }
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn synthesized_call_ids_are_unique() {
        let chunk = r#"{"candidates":[{"content":{"role":"model","parts":[{"functionCall":{"name":"a","args":{}}},{"functionCall":{"name":"b","args":{}}}]}}]}"#;
        let chunks: Vec<Result<GenerateContentChunk, SkylarkError>> =
            vec![Ok(serde_json::from_str(chunk).unwrap())];
        let mut stream =
            GeminiEventStream::new(Box::pin(futures::stream::iter(chunks)));

        let first = match stream.next().await.unwrap().unwrap() {
            ProviderEvent::ToolCall(call) => call.id,
            other => panic!("expected ToolCall, got {other:?}"),
        };
        let second = match stream.next().await.unwrap().unwrap() {
            ProviderEvent::ToolCall(call) => call.id,
            other => panic!("expected ToolCall, got {other:?}"),
        };
        assert_ne!(first, second);
    }
}
