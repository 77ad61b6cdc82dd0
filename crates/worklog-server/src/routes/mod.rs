pub mod credential;
pub mod reports;
pub mod worklog;
