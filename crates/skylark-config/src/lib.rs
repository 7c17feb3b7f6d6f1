// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered TOML + environment configuration for the Skylark service.

#![allow(clippy::result_large_err)]

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SkylarkConfig;

use skylark_core::SkylarkError;

/// Loads configuration from the standard hierarchy and validates it.
pub fn load_and_validate() -> Result<SkylarkConfig, SkylarkError> {
    let config =
        load_config().map_err(|e| SkylarkError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_with_defaults() {
        let config = load_and_validate().expect("default config should be valid");
        assert_eq!(config.chat.provider, "gemini");
    }
}
