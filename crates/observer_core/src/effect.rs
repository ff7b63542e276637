use std::fmt;

use crate::{JobId, SessionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AddSessionOption(SessionId),
    AddUserOption(UserId),
    /// Begin delivering result events for the joined session.
    StartResultStream { session_id: SessionId },
    SubmitJob { session_id: SessionId, snippet: String },
    /// Render a log entry for the job and wire its activation. Emitted once per job.
    AddJobEntry { job_id: JobId },
    MarkEntry { job_id: JobId },
    UnmarkEntry { job_id: JobId },
    /// Show a past job read-only alongside its output.
    ShowResult {
        job_id: JobId,
        snippet: String,
        output: String,
    },
    /// Restore the live editor content and clear the output display.
    ShowEditable,
    Notify(Notice),
}

/// User-visible notices raised by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoActiveSession,
    NoEditsSinceLastRun,
    AlreadyJoined { session_id: SessionId },
    JoinRejected { reason: String },
    SubmissionFailed { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoActiveSession => write!(f, "Join a session before running a snippet."),
            Notice::NoEditsSinceLastRun => {
                write!(f, "No edits observed since last execution! See last log.")
            }
            Notice::AlreadyJoined { session_id } => {
                write!(f, "Already working in session {session_id}.")
            }
            Notice::JoinRejected { reason } => write!(f, "{reason}"),
            Notice::SubmissionFailed { reason } => write!(f, "Execution request failed: {reason}"),
        }
    }
}
