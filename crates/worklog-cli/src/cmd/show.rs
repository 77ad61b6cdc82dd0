use crate::output::{print_json, print_text};
use std::path::Path;
use worklog_core::store::PLACEHOLDER;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let worklog = super::open(root)?;
    let (content, has_backup) =
        super::block_on(async { (worklog.read().await, worklog.has_backup().await) })?;

    if json {
        print_json(&serde_json::json!({
            "content": content,
            "has_backup": has_backup,
        }))?;
    } else if content.trim().is_empty() {
        print_text(PLACEHOLDER);
    } else {
        print_text(&content);
    }
    Ok(())
}
