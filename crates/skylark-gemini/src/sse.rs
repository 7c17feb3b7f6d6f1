// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for Gemini `streamGenerateContent` responses.
//!
//! Gemini streams unnamed SSE events whose `data` payload is one
//! [`GenerateContentChunk`] JSON object per event.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use skylark_core::SkylarkError;

use crate::types::GenerateContentChunk;

/// Parses a reqwest streaming response into typed [`GenerateContentChunk`]s.
///
/// Events with an empty data payload are skipped.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentChunk, SkylarkError>> + Send>> {
    let byte_stream = response.bytes_stream();
    let event_stream = byte_stream.eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                if event.data.is_empty() {
                    return None;
                }
                Some(
                    serde_json::from_str::<GenerateContentChunk>(&event.data).map_err(|e| {
                        SkylarkError::Provider {
                            message: format!("failed to parse stream chunk: {e}"),
                            source: Some(Box::new(e)),
                        }
                    }),
                )
            }
            Err(e) => Some(Err(SkylarkError::Provider {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Part;
    use futures::StreamExt;

    /// Serves the given SSE text via wiremock to get a real reqwest::Response.
    async fn mock_sse_response(sse_text: &str) -> reqwest::Response {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_text.to_string()),
            )
            .mount(&server)
            .await;

        reqwest::get(&server.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn parse_text_chunks_in_order() {
        let sse = concat!(
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Here \"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"you go\"}]},\"finishReason\":\"STOP\"}]}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_sse_stream(response);

        let first = stream.next().await.unwrap().unwrap();
        match &first.candidates[0].content.as_ref().unwrap().parts[0] {
            Part::Text { text } => assert_eq!(text, "Here "),
            other => panic!("expected Text, got {other:?}"),
        }

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(
            second.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );

        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn parse_function_call_chunk() {
        let sse = "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"functionCall\":{\"name\":\"getFlightStatus\",\"args\":{\"flightNumber\":\"BA142\"}}}]}}]}\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_sse_stream(response);

        let chunk = stream.next().await.unwrap().unwrap();
        match &chunk.candidates[0].content.as_ref().unwrap().parts[0] {
            Part::FunctionCall { function_call } => {
                assert_eq!(function_call.name, "getFlightStatus");
                assert_eq!(function_call.args["flightNumber"], "BA142");
            }
            other => panic!("expected FunctionCall, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_chunk_yields_error() {
        let sse = "data: {not json}\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_sse_stream(response);

        let item = stream.next().await.unwrap();
        assert!(item.is_err());
    }
}
