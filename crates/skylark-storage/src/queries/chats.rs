// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transcript CRUD operations.
//!
//! The full ordered message list is stored as one JSON document per chat.
//! Upserting the whole transcript makes the append path idempotent against
//! retries of the same turn.

use rusqlite::{OptionalExtension, params};
use skylark_core::SkylarkError;
use skylark_core::types::{ChatMessage, ChatRecord};

use crate::database::Database;

/// Upsert the full transcript for a chat.
pub async fn upsert_chat(
    db: &Database,
    chat_id: &str,
    user_id: &str,
    messages: &[ChatMessage],
    created_at: &str,
) -> Result<(), SkylarkError> {
    let chat_id = chat_id.to_string();
    let user_id = user_id.to_string();
    let created_at = created_at.to_string();
    let messages_json = serde_json::to_string(messages).map_err(|e| SkylarkError::Storage {
        source: Box::new(e),
    })?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chats (id, user_id, messages, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET messages = excluded.messages",
                params![chat_id, user_id, messages_json, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a chat with its deserialized transcript.
pub async fn get_chat(db: &Database, chat_id: &str) -> Result<Option<ChatRecord>, SkylarkError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ChatRecord>, Box<dyn std::error::Error + Send + Sync>> {
            let row: Option<(String, String, String, String)> = conn
                .query_row(
                    "SELECT id, user_id, messages, created_at FROM chats WHERE id = ?1",
                    params![chat_id],
                    |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                    },
                )
                .optional()?;

            let Some((id, user_id, messages_json, created_at)) = row else {
                return Ok(None);
            };
            let messages: Vec<ChatMessage> = serde_json::from_str(&messages_json)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
            Ok(Some(ChatRecord {
                id,
                user_id,
                messages,
                created_at,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a chat by id.
pub async fn delete_chat(db: &Database, chat_id: &str) -> Result<(), SkylarkError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM chats WHERE id = ?1", params![chat_id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
