// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities shared across Skylark crates: a scripted mock provider and
//! in-memory store implementations.

pub mod mock_provider;
pub mod store;

pub use mock_provider::{MockProvider, MockRound};
pub use store::InMemoryStore;
