mod config;
mod ledger;
mod models;
mod registry;
mod run;
mod store;

use anyhow::{Context, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        run::print_usage();
        return Ok(());
    }
    let config = config::Config::load_or_default(&config_path()?)?;
    run::as_cli(&args, &config)
}

fn config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "wedsheet", "Wedsheet")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    let dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}
