use crate::output::{print_json, print_text};
use anyhow::Context;
use std::path::Path;
use worklog_core::io::atomic_write;
use worklog_core::report::report_filename;
use worklog_core::ReportRequest;

pub fn run(
    root: &Path,
    from: &str,
    to: &str,
    style: &str,
    output: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let req = ReportRequest::parse(from, to, style)?;
    let worklog = super::open(root)?;
    let report = super::block_on(worklog.generate(&req))??;

    if let Some(path) = output {
        // A directory gets the default report file name.
        let path = if path.is_dir() {
            path.join(report_filename(&req))
        } else {
            path.to_path_buf()
        };
        atomic_write(&path, report.as_bytes())
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        if json {
            print_json(&serde_json::json!({ "path": path }))?;
        } else {
            println!("Report written to {}", path.display());
        }
        return Ok(());
    }

    if json {
        print_json(&serde_json::json!({
            "report": report,
            "filename": report_filename(&req),
        }))?;
    } else {
        print_text(&report);
    }
    Ok(())
}
