// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for transcripts and reservations.

use async_trait::async_trait;

use crate::error::SkylarkError;
use crate::types::{ChatMessage, ChatRecord, ReservationRecord};

/// Durable storage for conversation transcripts.
///
/// The orchestrator calls [`append_transcript`] once per completed turn with
/// the full ordered message set. Implementations must be idempotent-safe
/// against retries of the same turn; the core itself never retries.
///
/// [`append_transcript`]: TranscriptStore::append_transcript
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Upserts the full transcript for a conversation.
    async fn append_transcript(
        &self,
        chat_id: &str,
        user_id: &str,
        messages: &[ChatMessage],
    ) -> Result<(), SkylarkError>;

    /// Fetches a conversation by id.
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatRecord>, SkylarkError>;

    /// Deletes a conversation by id.
    async fn delete_chat(&self, chat_id: &str) -> Result<(), SkylarkError>;
}

/// Durable storage for reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Stores a new reservation. Reservations are immutable once created.
    async fn create_reservation(&self, record: &ReservationRecord) -> Result<(), SkylarkError>;

    /// Fetches a reservation by id.
    async fn get_reservation(
        &self,
        id: &str,
    ) -> Result<Option<ReservationRecord>, SkylarkError>;
}
