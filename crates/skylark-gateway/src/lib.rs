// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Skylark assistant service: bearer auth, the chat
//! turn endpoint with SSE streaming, chat deletion, and file upload.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sse;

pub use auth::{AuthConfig, AuthenticatedUser};
pub use server::{AppState, build_router, start_server};
