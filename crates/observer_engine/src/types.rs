use std::fmt;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// `GET /sessions` body. The server may send `null` for empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RegistryListing {
    #[serde(rename = "ExistingSessions", default, deserialize_with = "null_as_empty")]
    pub sessions: Vec<String>,
    #[serde(rename = "AllUsernames", default, deserialize_with = "null_as_empty")]
    pub users: Vec<String>,
}

/// `POST /execute` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "JobID")]
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "JobID")]
    pub job_id: String,
    #[serde(rename = "SessionID")]
    pub session_id: String,
    #[serde(rename = "Done", default)]
    pub done: bool,
    #[serde(rename = "Snippet", default)]
    pub snippet: String,
}

/// One execution result as published by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Job")]
    pub job: JobRecord,
    #[serde(rename = "Output", default)]
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RegistryFetched(RegistryListing),
    SubmissionAccepted {
        job_id: String,
        session_id: String,
        snippet: String,
    },
    SubmissionFailed {
        session_id: String,
        error: FetchError,
    },
    ResultArrived(ResultRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Malformed,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
