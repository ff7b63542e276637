use observer_core::{JobId, Msg, RegistrySnapshot, ResultEvent, SessionId};
use observer_engine::{EngineEvent, EngineHandle, ResultRecord};
use observer_logging::{observer_info, observer_warn};

/// Outbound work the coordinator hands to the transport.
pub trait JobDispatcher {
    fn submit(&self, session_id: &SessionId, snippet: &str);
    fn start_results(&self, session_id: &SessionId);
}

impl JobDispatcher for EngineHandle {
    fn submit(&self, session_id: &SessionId, snippet: &str) {
        observer_info!(
            "SubmitJob session={} snippet_len={}",
            session_id,
            snippet.len()
        );
        EngineHandle::submit(self, session_id.as_str(), snippet);
    }

    fn start_results(&self, session_id: &SessionId) {
        EngineHandle::start_results(self, session_id.as_str());
    }
}

/// Translates a transport event into a core message. Records carrying
/// unusable identifiers are dropped with a warning.
pub fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::RegistryFetched(listing) => Some(Msg::RegistryFetched(RegistrySnapshot {
            sessions: listing.sessions,
            users: listing.users,
        })),
        EngineEvent::SubmissionAccepted {
            job_id,
            session_id,
            snippet,
        } => match (JobId::parse(job_id), SessionId::parse(session_id)) {
            (Ok(job_id), Ok(session_id)) => Some(Msg::SubmissionAccepted {
                job_id,
                session_id,
                snippet,
            }),
            (Err(err), _) | (_, Err(err)) => Some(Msg::SubmissionFailed {
                reason: err.to_string(),
            }),
        },
        EngineEvent::SubmissionFailed { error, .. } => Some(Msg::SubmissionFailed {
            reason: error.to_string(),
        }),
        EngineEvent::ResultArrived(record) => map_record(record).map(Msg::ResultArrived),
    }
}

fn map_record(record: ResultRecord) -> Option<ResultEvent> {
    let job_id = match JobId::parse(record.job.job_id) {
        Ok(id) => id,
        Err(err) => {
            observer_warn!("Dropping result record: {}", err);
            return None;
        }
    };
    let session_id = match SessionId::parse(record.job.session_id) {
        Ok(id) => id,
        Err(err) => {
            observer_warn!("Dropping result record for job {}: {}", job_id, err);
            return None;
        }
    };
    Some(ResultEvent {
        job_id,
        session_id,
        done: record.job.done,
        snippet: record.job.snippet,
        output: record.output,
    })
}
