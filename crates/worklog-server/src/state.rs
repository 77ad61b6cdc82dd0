use std::sync::Arc;
use worklog_core::Worklog;

/// Shared handler state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub worklog: Arc<Worklog>,
}

impl AppState {
    pub fn new(worklog: Arc<Worklog>) -> Self {
        Self { worklog }
    }
}
