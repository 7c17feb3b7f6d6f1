// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for Skylark: attachment normalization and the
//! provider/tool turn loop.

pub mod normalize;
pub mod orchestrator;

pub use normalize::{normalize_messages, to_absolute_url};
pub use orchestrator::{Orchestrator, OrchestratorSettings, TurnEvent, TurnStream};
