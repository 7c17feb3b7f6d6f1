// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Skylark assistant service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use skylark_core::SkylarkError;

/// Top-level Skylark configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SkylarkConfig {
    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer-token authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Conversation settings (provider selection, base URL, system prompt).
    #[serde(default)]
    pub chat: ChatConfig,

    /// Gemini provider settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenAI provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// File upload settings.
    #[serde(default)]
    pub uploads: UploadConfig,
}

impl SkylarkConfig {
    /// Validates cross-field constraints figment cannot express.
    pub fn validate(&self) -> Result<(), SkylarkError> {
        match self.chat.provider.as_str() {
            "gemini" | "openai" => {}
            other => {
                return Err(SkylarkError::Config(format!(
                    "chat.provider must be \"gemini\" or \"openai\", got \"{other}\""
                )));
            }
        }
        if self.chat.base_url.is_empty() {
            return Err(SkylarkError::Config(
                "chat.base_url must not be empty".into(),
            ));
        }
        if self.chat.max_tokens == 0 {
            return Err(SkylarkError::Config(
                "chat.max_tokens must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Bearer-token authentication configuration.
///
/// Maps each accepted bearer token to the user id it authenticates. An empty
/// map means no caller can authenticate (fail-closed).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

/// Conversation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Active model provider: "gemini" or "openai".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Public base URL of this deployment, used to absolutize site-relative
    /// attachment URLs before provider submission.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Inline system prompt override. Falls back to the built-in booking
    /// prompt when unset.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            system_prompt: None,
            max_tokens: default_max_tokens(),
            log_level: default_log_level(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

/// OpenAI provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "skylark.db".to_string()
}

/// File upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Directory where uploaded files are written.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = SkylarkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.provider, "gemini");
        assert_eq!(config.chat.base_url, "http://localhost:3000");
    }

    #[test]
    fn unknown_provider_fails_validation() {
        let mut config = SkylarkConfig::default();
        config.chat.provider = "mystery".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn empty_base_url_fails_validation() {
        let mut config = SkylarkConfig::default();
        config.chat.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_tokens_fails_validation() {
        let mut config = SkylarkConfig::default();
        config.chat.max_tokens = 0;
        assert!(config.validate().is_err());
    }
}
