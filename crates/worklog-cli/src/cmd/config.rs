use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use worklog_core::config::{Config, WarnLevel};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration and any problems with it
    Show,
}

pub fn run(root: &Path, subcommand: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Show => show(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({
            "config": config,
            "warnings": warnings,
        }))?;
        return Ok(());
    }

    print!("{}", serde_yaml::to_string(&config)?);
    for w in &warnings {
        let prefix = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        eprintln!("{prefix}: {}", w.message);
    }
    Ok(())
}
