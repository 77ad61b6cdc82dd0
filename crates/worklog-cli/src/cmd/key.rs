use crate::output::print_json;
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum KeySubcommand {
    /// Report whether an API key is stored
    Status,
    /// Store an API key, replacing any existing one
    Set {
        /// OpenAI-style key (sk-...)
        key: String,
    },
    /// Remove the stored API key
    Delete,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: KeySubcommand, json: bool) -> anyhow::Result<()> {
    let worklog = super::open(root)?;
    match subcommand {
        KeySubcommand::Status => {
            let configured = worklog.credential_status();
            if json {
                print_json(&serde_json::json!({ "configured": configured }))?;
            } else if configured {
                println!("API key is configured.");
            } else {
                println!("No API key configured. Run 'worklog key set <key>'.");
            }
        }
        KeySubcommand::Set { key } => {
            worklog.save_credential(key.trim())?;
            if json {
                print_json(&serde_json::json!({ "status": "saved" }))?;
            } else {
                println!("API key saved.");
            }
        }
        KeySubcommand::Delete => {
            worklog.delete_credential()?;
            if json {
                print_json(&serde_json::json!({ "status": "deleted" }))?;
            } else {
                println!("API key deleted.");
            }
        }
    }
    Ok(())
}
