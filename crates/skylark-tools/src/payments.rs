// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process payment ledger.
//!
//! Payments are stubs: authorization and verification produce synthetic
//! records that live only for the lifetime of the process and are never
//! persisted. The ledger exists so `getBoardingPass` can check that a
//! payment actually reached `verified` for its reservation instead of
//! trusting the conversation flow.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Authorized,
    Verified,
}

/// A synthetic payment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub reservation_id: String,
    pub status: PaymentStatus,
    /// RFC 3339 authorization timestamp.
    pub authorized_at: String,
    /// RFC 3339 verification timestamp, once verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
}

/// Concurrent map of payment id to record.
#[derive(Default)]
pub struct PaymentLedger {
    records: DashMap<String, PaymentRecord>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an `authorized` payment for a reservation and returns it.
    pub fn authorize(&self, reservation_id: &str) -> PaymentRecord {
        let record = PaymentRecord {
            id: format!("pay_{}", uuid::Uuid::new_v4()),
            reservation_id: reservation_id.to_string(),
            status: PaymentStatus::Authorized,
            authorized_at: chrono::Utc::now().to_rfc3339(),
            verified_at: None,
        };
        self.records.insert(record.id.clone(), record.clone());
        record
    }

    /// Transitions a payment to `verified`. Returns the updated record, or
    /// `None` for an unknown payment id. Verifying twice is a no-op.
    pub fn verify(&self, payment_id: &str) -> Option<PaymentRecord> {
        let mut entry = self.records.get_mut(payment_id)?;
        if entry.status != PaymentStatus::Verified {
            entry.status = PaymentStatus::Verified;
            entry.verified_at = Some(chrono::Utc::now().to_rfc3339());
        }
        Some(entry.clone())
    }

    /// True when the given payment is verified and belongs to the given
    /// reservation.
    pub fn is_verified_for(&self, payment_id: &str, reservation_id: &str) -> bool {
        self.records
            .get(payment_id)
            .map(|record| {
                record.status == PaymentStatus::Verified
                    && record.reservation_id == reservation_id
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_creates_authorized_record() {
        let ledger = PaymentLedger::new();
        let record = ledger.authorize("res-1");
        assert!(record.id.starts_with("pay_"));
        assert_eq!(record.status, PaymentStatus::Authorized);
        assert!(record.verified_at.is_none());
    }

    #[test]
    fn verify_transitions_to_verified() {
        let ledger = PaymentLedger::new();
        let record = ledger.authorize("res-1");
        let verified = ledger.verify(&record.id).unwrap();
        assert_eq!(verified.status, PaymentStatus::Verified);
        assert!(verified.verified_at.is_some());
    }

    #[test]
    fn verify_unknown_payment_returns_none() {
        let ledger = PaymentLedger::new();
        assert!(ledger.verify("pay_missing").is_none());
    }

    #[test]
    fn is_verified_for_requires_matching_reservation() {
        let ledger = PaymentLedger::new();
        let record = ledger.authorize("res-1");

        assert!(!ledger.is_verified_for(&record.id, "res-1"), "not yet verified");

        ledger.verify(&record.id);
        assert!(ledger.is_verified_for(&record.id, "res-1"));
        assert!(!ledger.is_verified_for(&record.id, "res-other"));
        assert!(!ledger.is_verified_for("pay_missing", "res-1"));
    }

    #[test]
    fn double_verify_keeps_first_timestamp() {
        let ledger = PaymentLedger::new();
        let record = ledger.authorize("res-1");
        let first = ledger.verify(&record.id).unwrap();
        let second = ledger.verify(&record.id).unwrap();
        assert_eq!(first.verified_at, second.verified_at);
    }
}
