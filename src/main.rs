mod app;
mod behavior;
mod config;
mod focus;
mod input;
mod interact;
mod model;
mod motion;
mod pet;
mod render;
mod schedule;
mod speech;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::OpenOptions, path::Path};

/// The terminal belongs to the pet, so logs go to a file. `RUST_LOG` filters.
pub(crate) fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = config::Args::parse();
    app::run(args)
}
