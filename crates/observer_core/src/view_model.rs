use crate::JobId;

/// Title shown above the editor while editing.
pub const TITLE_EDITING: &str = "Snippet:";
/// Title shown while a past job is inspected.
pub const TITLE_READ_ONLY: &str = "Snippet: READ ONLY";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub user: Option<String>,
    pub session: Option<String>,
    pub sessions: Vec<String>,
    pub users: Vec<String>,
    pub job_count: usize,
    /// Newest first.
    pub jobs: Vec<JobRowView>,
    pub selected_job: Option<JobId>,
    pub title: &'static str,
    pub read_only: bool,
    pub can_execute: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub done: bool,
    pub selected: bool,
}
