// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./skylark.toml` > `~/.config/skylark/skylark.toml`
//! > `/etc/skylark/skylark.toml` with environment variable overrides via the
//! `SKYLARK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SkylarkConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/skylark/skylark.toml` (system-wide)
/// 3. `~/.config/skylark/skylark.toml` (user XDG config)
/// 4. `./skylark.toml` (local directory)
/// 5. `SKYLARK_*` environment variables
pub fn load_config() -> Result<SkylarkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkylarkConfig::default()))
        .merge(Toml::file("/etc/skylark/skylark.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("skylark/skylark.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("skylark.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SkylarkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkylarkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SkylarkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkylarkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SKYLARK_CHAT_BASE_URL` must map to
/// `chat.base_url`, not `chat.base.url`.
fn env_provider() -> Env {
    Env::prefixed("SKYLARK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SKYLARK_GEMINI_API_KEY -> "gemini_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("chat_", "chat.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("uploads_", "uploads.", 1);
        mapped.into()
    })
}
