// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `skylark serve` command implementation.
//!
//! Wires the configured provider, the SQLite store, the tool registry, and
//! the orchestrator into the gateway, then serves until shutdown.

use std::sync::Arc;

use tracing::info;

use skylark_agent::{Orchestrator, OrchestratorSettings};
use skylark_config::SkylarkConfig;
use skylark_core::{ProviderAdapter, SkylarkError};
use skylark_gateway::{AppState, AuthConfig, build_router, start_server};
use skylark_gemini::GeminiProvider;
use skylark_openai::OpenAiProvider;
use skylark_storage::SqliteStore;

/// Runs the `skylark serve` command.
pub async fn run_serve(config: SkylarkConfig) -> Result<(), SkylarkError> {
    init_tracing(&config.chat.log_level);

    info!("starting skylark serve");

    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let provider = build_provider(&config)?;
    info!(provider = provider.name(), "model provider initialized");

    let tools = Arc::new(skylark_tools::default_registry()?);
    let orchestrator = Arc::new(Orchestrator::new(
        provider,
        tools,
        store.clone(),
        store.clone(),
        OrchestratorSettings {
            base_url: config.chat.base_url.clone(),
            system_prompt: config.chat.system_prompt.clone(),
            max_tokens: config.chat.max_tokens,
        },
    ));

    let state = AppState {
        orchestrator,
        transcripts: store.clone(),
        uploads_dir: config.uploads.dir.clone().into(),
        start_time: std::time::Instant::now(),
    };
    let auth = AuthConfig {
        tokens: config.auth.tokens.clone(),
    };

    let router = build_router(state, auth);
    let result = start_server(&config.server.host, config.server.port, router).await;

    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "storage close failed during shutdown");
    }
    result
}

/// Resolves the configured model provider.
fn build_provider(config: &SkylarkConfig) -> Result<Arc<dyn ProviderAdapter>, SkylarkError> {
    match config.chat.provider.as_str() {
        "gemini" => {
            let api_key = config.gemini.api_key.clone().ok_or_else(|| {
                SkylarkError::Config(
                    "gemini.api_key is required (or set SKYLARK_GEMINI_API_KEY)".into(),
                )
            })?;
            Ok(Arc::new(GeminiProvider::new(
                api_key,
                config.gemini.model.clone(),
            )?))
        }
        "openai" => {
            let api_key = config.openai.api_key.clone().ok_or_else(|| {
                SkylarkError::Config(
                    "openai.api_key is required (or set SKYLARK_OPENAI_API_KEY)".into(),
                )
            })?;
            Ok(Arc::new(OpenAiProvider::new(
                api_key,
                config.openai.model.clone(),
            )?))
        }
        other => Err(SkylarkError::Config(format!(
            "unknown chat.provider \"{other}\""
        ))),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_provider_requires_api_key() {
        let config = SkylarkConfig::default();
        let err = build_provider(&config).unwrap_err();
        assert!(err.to_string().contains("gemini.api_key"));
    }

    #[test]
    fn build_provider_selects_configured_backend() {
        let mut config = SkylarkConfig::default();
        config.gemini.api_key = Some("key".into());
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");

        config.chat.provider = "openai".into();
        config.openai.api_key = Some("key".into());
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
