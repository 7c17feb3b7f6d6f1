// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool catalog for the Skylark flight-booking workflow.
//!
//! The registry holds the eight declared tools: flight search, flight
//! status, seat selection, reservation creation/lookup, the payment stubs,
//! and boarding pass issuance.

pub mod actions;
pub mod booking;
pub mod flights;
pub mod payments;
pub mod tool;

pub use payments::{PaymentLedger, PaymentRecord, PaymentStatus};
pub use tool::{Tool, ToolContext, ToolOutput, ToolRegistry};

use std::sync::Arc;

use skylark_core::SkylarkError;

/// Builds the fixed tool registry for the booking workflow.
pub fn default_registry() -> Result<ToolRegistry, SkylarkError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(flights::FindFlightsTool))?;
    registry.register(Arc::new(flights::GetFlightStatusTool))?;
    registry.register(Arc::new(flights::SelectSeatsTool))?;
    registry.register(Arc::new(booking::CreateReservationTool))?;
    registry.register(Arc::new(booking::GetReservationTool))?;
    registry.register(Arc::new(booking::AuthorizePaymentTool))?;
    registry.register(Arc::new(booking::VerifyPaymentTool))?;
    registry.register(Arc::new(booking::GetBoardingPassTool))?;
    Ok(registry)
}
