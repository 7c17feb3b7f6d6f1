// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skylark - a conversational flight-booking assistant service.
//!
//! This is the binary entry point.

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Skylark - a conversational flight-booking assistant service.
#[derive(Parser, Debug)]
#[command(name = "skylark", version, about, long_about = None)]
struct Cli {
    /// Path to a config file. Falls back to the XDG hierarchy when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the assistant server.
    Serve,
    /// Print the resolved configuration (secrets redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("skylark: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("skylark serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&redacted(config)) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("skylark config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("skylark: use --help for available commands");
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<skylark_config::SkylarkConfig, skylark_core::SkylarkError> {
    let config = match path {
        Some(path) => skylark_config::load_config_from_path(path)
            .map_err(|e| skylark_core::SkylarkError::Config(e.to_string()))?,
        None => skylark_config::load_config()
            .map_err(|e| skylark_core::SkylarkError::Config(e.to_string()))?,
    };
    config.validate()?;
    Ok(config)
}

/// Strips secrets before printing.
fn redacted(mut config: skylark_config::SkylarkConfig) -> skylark_config::SkylarkConfig {
    if config.gemini.api_key.is_some() {
        config.gemini.api_key = Some("[redacted]".to_string());
    }
    if config.openai.api_key.is_some() {
        config.openai.api_key = Some("[redacted]".to_string());
    }
    config.auth.tokens = config
        .auth
        .tokens
        .into_values()
        .enumerate()
        .map(|(i, user)| (format!("[redacted-{i}]"), user))
        .collect();
    config
}
