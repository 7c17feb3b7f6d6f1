// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Skylark assistant service.
//!
//! This crate provides the conversation data model, the error taxonomy, and
//! the adapter traits implemented by model providers and storage backends.
//! Higher crates (agent, gateway, tools) depend only on what is defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ProviderErrorKind, SkylarkError};
pub use traits::{EventStream, ProviderAdapter, ReservationStore, TranscriptStore};
