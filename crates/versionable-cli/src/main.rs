//! versionable - demo command line for the versionable library.
//!
//! Keeps a `people` table in a JSON file and versions every change to it:
//! each add, update and remove writes YAML snapshots under the storage root
//! and commits them to the git repository there.
//!
//! # Configuration
//!
//! A `.env` file in the working directory is loaded first. Then:
//!
//! - `--config <file>` - TOML, JSON or YAML configuration
//! - `VERSIONABLE_*` environment variables override the file
//! - `--storage-root <dir>` overrides both
//! - `RUST_LOG` controls log output on stderr (default `info`)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use versionable_core::VersionableError;

mod args;
mod commands;
mod db;
mod person;

use args::Cli;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    commands::run(cli).inspect_err(|e| {
        if let Some(err) = e.downcast_ref::<VersionableError>() {
            tracing::error!(code = err.code().as_str(), "{}", err);
            if let Some(hint) = err.suggestion() {
                eprintln!("hint: {}", hint);
            }
        }
    })
}
