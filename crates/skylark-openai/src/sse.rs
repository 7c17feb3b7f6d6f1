// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for chat completions streaming responses.
//!
//! The protocol streams unnamed SSE events whose `data` payload is one
//! [`ChatCompletionChunk`] JSON object, terminated by a literal `[DONE]`.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use skylark_core::SkylarkError;

use crate::types::ChatCompletionChunk;

/// Parses a reqwest streaming response into typed [`ChatCompletionChunk`]s.
///
/// The `[DONE]` sentinel and empty events are skipped; the stream ends when
/// the response body closes.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, SkylarkError>> + Send>> {
    let byte_stream = response.bytes_stream();
    let event_stream = byte_stream.eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() || data == "[DONE]" {
                    return None;
                }
                Some(
                    serde_json::from_str::<ChatCompletionChunk>(data).map_err(|e| {
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
