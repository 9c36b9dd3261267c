//! cliengine game launcher entry point.
//!
//! Manages save profiles from the `>` prompt and plays them in a `>>`
//! session. The working directory (settings and saves) is taken from the
//! first CLI argument, the `CLIENGINE_HOME` env var, or `~/cliengine`.

mod launcher;
mod prompt;
mod render;
mod session;
mod shell;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use cliengine_profile::DirectoryStore;
use cliengine_types::config::Settings;
use launcher::Launcher;
use prompt::StdinPrompt;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let home = working_directory()?;
    fs::create_dir_all(&home)
        .with_context(|| format!("creating working directory {}", home.display()))?;
    log::info!("Working directory: {}", home.display());

    let settings = Settings::load_or_init(&home).context("loading settings")?;
    let store = DirectoryStore::new(home.join(&settings.saves_dir), &settings.record_extension);
    log::debug!("Saves directory: {}", store.dir().display());

    let mut launcher = Launcher::new(Box::new(store), Box::new(StdinPrompt::new()), settings);
    launcher.run()?;
    Ok(())
}

/// Resolve the working directory from CLI arg, `CLIENGINE_HOME`, or the
/// user's home.
fn working_directory() -> Result<PathBuf> {
    if let Some(dir) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = std::env::var_os("CLIENGINE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .context("cannot locate the home directory; pass a working directory argument")?;
    Ok(PathBuf::from(home).join("cliengine"))
}
