// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store implementations for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use skylark_core::types::{ChatMessage, ChatRecord, ReservationRecord};
use skylark_core::{ReservationStore, SkylarkError, TranscriptStore};

/// Map-backed store implementing both persistence traits.
///
/// Appends can be flipped to fail for exercising the orchestrator's
/// swallow-and-log path; `append_count` tracks attempts either way.
#[derive(Default)]
pub struct InMemoryStore {
    chats: DashMap<String, ChatRecord>,
    reservations: DashMap<String, ReservationRecord>,
    fail_appends: AtomicBool,
    append_count: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `append_transcript` fail.
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    /// Number of append attempts seen (successful or not).
    pub fn append_count(&self) -> usize {
        self.append_count.load(Ordering::SeqCst)
    }

    /// Number of stored chats.
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryStore {
    async fn append_transcript(
        &self,
        chat_id: &str,
        user_id: &str,
        messages: &[ChatMessage],
    ) -> Result<(), SkylarkError> {
        self.append_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(SkylarkError::Storage {
                source: "simulated append failure".into(),
            });
        }
        let record = ChatRecord {
            id: chat_id.to_string(),
            user_id: user_id.to_string(),
            messages: messages.to_vec(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        self.chats.insert(chat_id.to_string(), record);
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatRecord>, SkylarkError> {
        Ok(self.chats.get(chat_id).map(|entry| entry.clone()))
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<(), SkylarkError> {
        self.chats.remove(chat_id);
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn create_reservation(&self, record: &ReservationRecord) -> Result<(), SkylarkError> {
        self.reservations
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get_reservation(
        &self,
        id: &str,
    ) -> Result<Option<ReservationRecord>, SkylarkError> {
        Ok(self.reservations.get(id).map(|entry| entry.clone()))
    }
}
