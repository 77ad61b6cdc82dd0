use crate::output::print_json;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let worklog = super::open(root)?;
    let content = super::block_on(worklog.undo())??;

    if json {
        print_json(&serde_json::json!({ "content": content }))?;
    } else {
        println!("Restored the previous version of the worklog.");
    }
    Ok(())
}
