//! # Furrow
//!
//! Runs a headless farming session.
//!
//! Usage: `furrow [CONFIG] [--resume] [--export-json PATH]`
//!
//! `CONFIG` defaults to `furrow.toml`. With `--resume` the session continues
//! from the configured save slot if it exists.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use furrow_engine::{EngineConfig, SaveManager, Session};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line options.
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    resume: bool,
    export_json: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Self::default();
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--resume" => args.resume = true,
                "--export-json" => {
                    let path = iter.next().context("--export-json needs a path")?;
                    args.export_json = Some(PathBuf::from(path));
                },
                other if other.starts_with("--") => anyhow::bail!("Unknown option: {other}"),
                other => args.config = Some(PathBuf::from(other)),
            }
        }
        Ok(args)
    }
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("furrow=info".parse()?))
        .init();

    info!("Furrow starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse()?;
    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    let manager = SaveManager::new(&config.save_dir);
    let save_name = config.save_name.clone();
    let autosave = config.autosave;

    let mut session = Session::from_config(config).context("Failed to set up weather")?;
    if args.resume && manager.exists(&save_name) {
        let save = manager
            .load(&save_name)
            .with_context(|| format!("Failed to load save '{save_name}'"))?;
        session = session.resume(&save)?;
    }

    let report = session.run();
    println!("{}", serde_json::to_string_pretty(&report)?);

    if autosave {
        session.save(&manager).context("Autosave failed")?;
        if let Some(path) = &args.export_json {
            manager.export_json(&save_name, path)?;
        }
    } else if let Some(path) = &args.export_json {
        std::fs::write(path, session.to_save().to_json()?)?;
    }

    info!("Furrow shutdown complete");
    Ok(())
}
