use std::path::Path;
use std::sync::Arc;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    let worklog = Arc::new(super::open(root)?);
    super::block_on(worklog_server::serve(worklog, port))?
}
