use crate::{JobId, SessionId};

/// Raw registry listing as fetched from the server; entries are validated on merge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrySnapshot {
    pub sessions: Vec<String>,
    pub users: Vec<String>,
}

/// Execution result pushed by the worker for some session's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEvent {
    pub job_id: JobId,
    pub session_id: SessionId,
    pub done: bool,
    pub snippet: String,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Create a new session; the id must not be taken yet.
    New,
    /// Join a session already listed in the registry.
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a user name and session to work in.
    JoinRequested {
        user: String,
        session: String,
        mode: JoinMode,
    },
    /// Periodic registry poll returned a snapshot.
    RegistryFetched(RegistrySnapshot),
    /// The editor reported a content change.
    ContentEdited,
    /// User asked to run the current editor content.
    ExecuteRequested { content: String },
    /// Worker acknowledged a submission.
    SubmissionAccepted {
        job_id: JobId,
        session_id: SessionId,
        snippet: String,
    },
    /// Submission could not be delivered or was rejected.
    SubmissionFailed { reason: String },
    /// Result event delivered by the transport.
    ResultArrived(ResultEvent),
    /// User activated a job log entry.
    JobSelected { job_id: JobId },
}
