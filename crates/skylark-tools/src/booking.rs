// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking tools: reservation creation/lookup, payment stubs, and boarding
//! pass issuance.
//!
//! `createReservation` and `getReservation` go through the reservation
//! store; their failures come back to the model as error results so the
//! conversation can recover. The payment tools are process-local stubs
//! backed by the [`PaymentLedger`](crate::payments::PaymentLedger), and
//! `getBoardingPass` refuses to issue a pass without a verified payment for
//! the reservation.

use async_trait::async_trait;
use serde::Deserialize;
use skylark_core::SkylarkError;
use skylark_core::types::{Passenger, ReservationDetails, ReservationRecord, ReturnFlight};
use tracing::info;

use crate::actions;
use crate::tool::{Tool, ToolContext, ToolOutput};

fn passenger_schema(with_email: bool) -> serde_json::Value {
    let mut properties = serde_json::json!({
        "name": {
            "type": "string",
            "description": "Passenger name"
        },
        "seat": {
            "type": "string",
            "pattern": "^[0-9]+[A-F]$",
            "description": "Seat number (e.g., 12A, 12B). Format is [row number][seat letter]."
        }
    });
    if with_email {
        properties["email"] = serde_json::json!({
            "type": "string",
            "description": "Passenger email"
        });
    }
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": ["name", "seat"]
    })
}

/// Creates a reservation for the authenticated caller.
pub struct CreateReservationTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReservationParams {
    flight_number: String,
    date: String,
    passengers: Vec<Passenger>,
    #[serde(default)]
    return_flight: Option<ReturnFlight>,
}

#[async_trait]
impl Tool for CreateReservationTool {
    fn name(&self) -> &str {
        "createReservation"
    }

    fn description(&self) -> &str {
        "Creates a reservation with the selected flights, passenger information, and selected seats."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "flightNumber": {
                    "type": "string",
                    "description": "Flight number, including airline code and number (e.g., BA142)"
                },
                "date": {
                    "type": "string",
                    "description": "Date of the flight (YYYY-MM-DD)"
                },
                "passengers": {
                    "type": "array",
                    "minItems": 1,
                    "items": passenger_schema(true),
                    "description": "Array of passengers and their selected seats"
                },
                "returnFlight": {
                    "type": "object",
                    "properties": {
                        "flightNumber": {
                            "type": "string",
                            "description": "Return flight number, including airline code and number (e.g., BA143)"
                        },
                        "date": {
                            "type": "string",
                            "description": "Date of the return flight (YYYY-MM-DD)"
                        },
                        "passengers": {
                            "type": "array",
                            "items": passenger_schema(false),
                            "description": "Array of passengers and their selected seats"
                        }
                    },
                    "required": ["flightNumber", "date"],
                    "description": "Return flight information"
                }
            },
            "required": ["flightNumber", "date", "passengers"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let Some(user_id) = ctx.user_id.as_deref() else {
            return Ok(ToolOutput::error("user is not authenticated"));
        };

        let params: CreateReservationParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;

        let record = ReservationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            details: ReservationDetails {
                flight_number: params.flight_number,
                date: params.date,
                passengers: params.passengers,
                return_flight: params.return_flight,
                total_price_usd: actions::generate_reservation_price(),
            },
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Err(e) = ctx.reservations.create_reservation(&record).await {
            return Ok(ToolOutput::error(format!(
                "could not store reservation, please retry: {e}"
            )));
        }

        info!(reservation_id = %record.id, user_id, "reservation created");

        Ok(ToolOutput::json(&serde_json::json!({
            "reservationId": record.id,
            "totalPriceUsd": record.details.total_price_usd,
        })))
    }
}

/// Looks up a reservation by id.
pub struct GetReservationTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetReservationParams {
    reservation_id: String,
}

#[async_trait]
impl Tool for GetReservationTool {
    fn name(&self) -> &str {
        "getReservation"
    }

    fn description(&self) -> &str {
        "Gets a reservation by ID."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservationId": {
                    "type": "string",
                    "description": "Reservation ID"
                }
            },
            "required": ["reservationId"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: GetReservationParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;

        match ctx.reservations.get_reservation(&params.reservation_id).await {
            Ok(Some(record)) => Ok(ToolOutput::json(
                &serde_json::to_value(&record)
                    .map_err(|e| SkylarkError::Internal(e.to_string()))?,
            )),
            Ok(None) => Ok(ToolOutput::error(format!(
                "reservation {} not found",
                params.reservation_id
            ))),
            Err(e) => Ok(ToolOutput::error(format!(
                "could not load reservation, please retry: {e}"
            ))),
        }
    }
}

/// Authorizes a payment for a reservation. Stateless stub: the record lives
/// only in the in-process ledger.
pub struct AuthorizePaymentTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizePaymentParams {
    reservation_id: String,
    #[allow(dead_code)]
    payment_method: String,
    #[allow(dead_code)]
    amount: f64,
    #[allow(dead_code)]
    currency: String,
}

#[async_trait]
impl Tool for AuthorizePaymentTool {
    fn name(&self) -> &str {
        "authorizePayment"
    }

    fn description(&self) -> &str {
        "Authorizes a payment for a reservation. Returns the payment details."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservationId": {
                    "type": "string",
                    "description": "Reservation ID"
                },
                "paymentMethod": {
                    "type": "string",
                    "description": "Payment method (credit_card, paypal, apple_pay)"
                },
                "amount": {
                    "type": "number",
                    "description": "Payment amount"
                },
                "currency": {
                    "type": "string",
                    "description": "Payment currency (USD, EUR, GBP, etc.)"
                }
            },
            "required": ["reservationId", "paymentMethod", "amount", "currency"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: AuthorizePaymentParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;

        let record = ctx.payments.authorize(&params.reservation_id);
        Ok(ToolOutput::json(&serde_json::json!({
            "paymentId": record.id,
            "reservationId": record.reservation_id,
            "status": "authorized",
            "transactionDate": record.authorized_at,
        })))
    }
}

/// Verifies a payment by payment id.
pub struct VerifyPaymentTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyPaymentParams {
    payment_id: String,
}

#[async_trait]
impl Tool for VerifyPaymentTool {
    fn name(&self) -> &str {
        "verifyPayment"
    }

    fn description(&self) -> &str {
        "Verifies a payment by payment ID."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "paymentId": {
                    "type": "string",
                    "description": "Payment ID"
                }
            },
            "required": ["paymentId"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: VerifyPaymentParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;

        match ctx.payments.verify(&params.payment_id) {
            Some(record) => Ok(ToolOutput::json(&serde_json::json!({
                "status": "verified",
                "verificationDate": record.verified_at,
            }))),
            None => Ok(ToolOutput::error(format!(
                "payment {} not found",
                params.payment_id
            ))),
        }
    }
}

/// Issues a boarding pass for a reservation with a verified payment.
pub struct GetBoardingPassTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBoardingPassParams {
    reservation_id: String,
    payment_id: String,
}

#[async_trait]
impl Tool for GetBoardingPassTool {
    fn name(&self) -> &str {
        "getBoardingPass"
    }

    fn description(&self) -> &str {
        "Gets a boarding pass by reservation ID. Requires a verified payment."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservationId": {
                    "type": "string",
                    "description": "Reservation ID"
                },
                "paymentId": {
                    "type": "string",
                    "description": "Payment ID"
                }
            },
            "required": ["reservationId", "paymentId"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: GetBoardingPassParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;

        if !ctx
            .payments
            .is_verified_for(&params.payment_id, &params.reservation_id)
        {
            return Ok(ToolOutput::error(format!(
                "payment {} has not been verified for reservation {}",
                params.payment_id, params.reservation_id
            )));
        }

        let pass = actions::generate_boarding_pass(&params.reservation_id);
        Ok(ToolOutput::json(
            &serde_json::to_value(pass).map_err(|e| SkylarkError::Internal(e.to_string()))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_context;
    use crate::tool::ToolRegistry;
    use skylark_core::types::ToolCall;
    use std::sync::Arc;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CreateReservationTool)).unwrap();
        registry.register(Arc::new(GetReservationTool)).unwrap();
        registry.register(Arc::new(AuthorizePaymentTool)).unwrap();
        registry.register(Arc::new(VerifyPaymentTool)).unwrap();
        registry.register(Arc::new(GetBoardingPassTool)).unwrap();
        registry
    }

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments,
        }
    }

    fn reservation_args() -> serde_json::Value {
        serde_json::json!({
            "flightNumber": "BA142",
            "date": "2025-06-01",
            "passengers": [
                {"name": "Ada Lovelace", "seat": "12A"},
                {"name": "Charles Babbage", "email": "cb@example.com", "seat": "12B"}
            ]
        })
    }

    #[tokio::test]
    async fn create_reservation_rejects_unauthenticated_caller() {
        let ctx = test_context(None);
        let result = registry()
            .dispatch(&call("createReservation", reservation_args()), &ctx)
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("not authenticated"));
    }

    #[tokio::test]
    async fn create_reservation_is_retrievable_with_positive_price() {
        let ctx = test_context(Some("user-1"));
        let registry = registry();

        let created = registry
            .dispatch(&call("createReservation", reservation_args()), &ctx)
            .await;
        assert!(!created.is_error, "got: {}", created.content);
        let payload: serde_json::Value = serde_json::from_str(&created.content).unwrap();
        let reservation_id = payload["reservationId"].as_str().unwrap();
        assert!(
            uuid::Uuid::parse_str(reservation_id).is_ok(),
            "id must be UUID-shaped: {reservation_id}"
        );
        assert!(payload["totalPriceUsd"].as_u64().unwrap() > 0);

        let fetched = registry
            .dispatch(
                &call(
                    "getReservation",
                    serde_json::json!({"reservationId": reservation_id}),
                ),
                &ctx,
            )
            .await;
        assert!(!fetched.is_error, "got: {}", fetched.content);
        let record: serde_json::Value = serde_json::from_str(&fetched.content).unwrap();
        assert_eq!(record["id"], reservation_id);
        assert_eq!(record["user_id"], "user-1");
        assert_eq!(record["details"]["passengers"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_reservation_reports_missing_id() {
        let ctx = test_context(Some("user-1"));
        let result = registry()
            .dispatch(
                &call(
                    "getReservation",
                    serde_json::json!({"reservationId": "res-missing"}),
                ),
                &ctx,
            )
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("not found"));
    }

    #[tokio::test]
    async fn payment_flow_authorize_then_verify() {
        let ctx = test_context(Some("user-1"));
        let registry = registry();

        let authorized = registry
            .dispatch(
                &call(
                    "authorizePayment",
                    serde_json::json!({
                        "reservationId": "res-1",
                        "paymentMethod": "credit_card",
                        "amount": 420.0,
                        "currency": "USD"
                    }),
                ),
                &ctx,
            )
            .await;
        assert!(!authorized.is_error);
        let payload: serde_json::Value = serde_json::from_str(&authorized.content).unwrap();
        assert_eq!(payload["status"], "authorized");
        let payment_id = payload["paymentId"].as_str().unwrap().to_string();

        let verified = registry
            .dispatch(
                &call("verifyPayment", serde_json::json!({"paymentId": payment_id})),
                &ctx,
            )
            .await;
        assert!(!verified.is_error);
        let payload: serde_json::Value = serde_json::from_str(&verified.content).unwrap();
        assert_eq!(payload["status"], "verified");
    }

    #[tokio::test]
    async fn boarding_pass_requires_verified_payment() {
        let ctx = test_context(Some("user-1"));
        let registry = registry();

        // Unknown payment: refused.
        let refused = registry
            .dispatch(
                &call(
                    "getBoardingPass",
                    serde_json::json!({"reservationId": "res-1", "paymentId": "pay_missing"}),
                ),
                &ctx,
            )
            .await;
        assert!(refused.is_error);
        assert!(refused.content.contains("not been verified"));

        // Authorized but unverified: still refused.
        let record = ctx.payments.authorize("res-1");
        let refused = registry
            .dispatch(
                &call(
                    "getBoardingPass",
                    serde_json::json!({"reservationId": "res-1", "paymentId": record.id}),
                ),
                &ctx,
            )
            .await;
        assert!(refused.is_error);

        // Verified for a different reservation: refused.
        ctx.payments.verify(&record.id);
        let refused = registry
            .dispatch(
                &call(
                    "getBoardingPass",
                    serde_json::json!({"reservationId": "res-other", "paymentId": record.id}),
                ),
                &ctx,
            )
            .await;
        assert!(refused.is_error);

        // Verified for the right reservation: issued.
        let issued = registry
            .dispatch(
                &call(
                    "getBoardingPass",
                    serde_json::json!({"reservationId": "res-1", "paymentId": record.id}),
                ),
                &ctx,
            )
            .await;
        assert!(!issued.is_error, "got: {}", issued.content);
        let payload: serde_json::Value = serde_json::from_str(&issued.content).unwrap();
        assert_eq!(payload["reservationId"], "res-1");
        assert!(payload["gateNumber"].is_string());
    }
}
