// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the transcript and reservation store traits.

use async_trait::async_trait;
use tracing::debug;

use skylark_config::model::StorageConfig;
use skylark_core::types::{ChatMessage, ChatRecord, ReservationRecord};
use skylark_core::{ReservationStore, SkylarkError, TranscriptStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. Concurrent writers are serialized through the single
/// connection; writes for independent conversations interleave freely.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the store at the configured database path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, SkylarkError> {
        let db = Database::open(&config.database_path).await?;
        debug!(path = %config.database_path, "SQLite store opened");
        Ok(Self { db })
    }

    /// Flushes pending writes and checkpoints the WAL.
    pub async fn close(&self) -> Result<(), SkylarkError> {
        self.db.close().await
    }
}

#[async_trait]
impl TranscriptStore for SqliteStore {
    async fn append_transcript(
        &self,
        chat_id: &str,
        user_id: &str,
        messages: &[ChatMessage],
    ) -> Result<(), SkylarkError> {
        let created_at = chrono::Utc::now().to_rfc3339();
        queries::chats::upsert_chat(&self.db, chat_id, user_id, messages, &created_at).await
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatRecord>, SkylarkError> {
        queries::chats::get_chat(&self.db, chat_id).await
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<(), SkylarkError> {
        queries::chats::delete_chat(&self.db, chat_id).await
    }
}

#[async_trait]
impl ReservationStore for SqliteStore {
    async fn create_reservation(&self, record: &ReservationRecord) -> Result<(), SkylarkError> {
        queries::reservations::insert_reservation(&self.db, record).await
    }

    async fn get_reservation(
        &self,
        id: &str,
    ) -> Result<Option<ReservationRecord>, SkylarkError> {
        queries::reservations::get_reservation(&self.db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylark_core::types::{Passenger, ReservationDetails};
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    #[tokio::test]
    async fn transcript_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        let messages = vec![
            ChatMessage::user("find me a flight"),
            ChatMessage::assistant("where to?"),
        ];
        store
            .append_transcript("chat-1", "user-1", &messages)
            .await
            .unwrap();

        let record = store.get_chat("chat-1").await.unwrap().unwrap();
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.messages.len(), 2);

        // Appending the same turn again is idempotent-safe.
        store
            .append_transcript("chat-1", "user-1", &messages)
            .await
            .unwrap();
        let record = store.get_chat("chat-1").await.unwrap().unwrap();
        assert_eq!(record.messages.len(), 2);

        store.delete_chat("chat-1").await.unwrap();
        assert!(store.get_chat("chat-1").await.unwrap().is_none());

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn reservation_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reservations.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        let record = ReservationRecord {
            id: "res-1".into(),
            user_id: "user-1".into(),
            details: ReservationDetails {
                flight_number: "BA142".into(),
                date: "2025-06-01".into(),
                passengers: vec![Passenger {
                    name: "Ada Lovelace".into(),
                    email: None,
                    seat: "12A".into(),
                }],
                return_flight: None,
                total_price_usd: 420,
            },
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        store.create_reservation(&record).await.unwrap();

        let fetched = store.get_reservation("res-1").await.unwrap().unwrap();
        assert_eq!(fetched, record);
        assert!(store.get_reservation("res-2").await.unwrap().is_none());

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_appends_to_independent_chats() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("concurrent.db");
        let store = std::sync::Arc::new(
            SqliteStore::open(&make_config(db_path.to_str().unwrap()))
                .await
                .unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let messages = vec![ChatMessage::user(format!("hello {i}"))];
                store
                    .append_transcript(&format!("chat-{i}"), "user-1", &messages)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for i in 0..8 {
            let record = store.get_chat(&format!("chat-{i}")).await.unwrap().unwrap();
            assert_eq!(record.messages[0].content, format!("hello {i}"));
        }

        store.close().await.unwrap();
    }
}
