use crate::output::print_json;
use std::path::Path;

pub fn run(root: &Path, entries: &[String], json: bool) -> anyhow::Result<()> {
    let worklog = super::open(root)?;
    super::block_on(worklog.organize(entries))??;

    if json {
        let content = super::block_on(worklog.read())?;
        print_json(&serde_json::json!({ "content": content }))?;
    } else {
        let n = entries.iter().filter(|e| !e.trim().is_empty()).count();
        let noun = if n == 1 { "entry" } else { "entries" };
        println!("Added {n} {noun} to the worklog.");
    }
    Ok(())
}
