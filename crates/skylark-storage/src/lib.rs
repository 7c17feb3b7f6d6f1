// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for chat transcripts and reservations.
//!
//! Layout mirrors one concern per module: connection lifecycle in
//! [`database`], embedded migrations in [`migrations`], typed queries under
//! [`queries`], and the trait implementations in [`adapter`].

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
