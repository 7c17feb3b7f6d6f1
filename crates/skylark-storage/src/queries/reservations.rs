// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation CRUD operations.

use rusqlite::{OptionalExtension, params};
use skylark_core::SkylarkError;
use skylark_core::types::{ReservationDetails, ReservationRecord};

use crate::database::Database;

/// Insert a new reservation.
pub async fn insert_reservation(
    db: &Database,
    record: &ReservationRecord,
) -> Result<(), SkylarkError> {
    let id = record.id.clone();
    let user_id = record.user_id.clone();
    let created_at = record.created_at.clone();
    let details_json =
        serde_json::to_string(&record.details).map_err(|e| SkylarkError::Storage {
            source: Box::new(e),
        })?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO reservations (id, user_id, details, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, user_id, details_json, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a reservation by id.
pub async fn get_reservation(
    db: &Database,
    id: &str,
) -> Result<Option<ReservationRecord>, SkylarkError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ReservationRecord>, Box<dyn std::error::Error + Send + Sync>> {
            let row: Option<(String, String, String, String)> = conn
                .query_row(
                    "SELECT id, user_id, details, created_at FROM reservations WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                    },
                )
                .optional()?;

            let Some((id, user_id, details_json, created_at)) = row else {
                return Ok(None);
            };
            let details: ReservationDetails = serde_json::from_str(&details_json)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
            Ok(Some(ReservationRecord {
                id,
                user_id,
                details,
                created_at,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
