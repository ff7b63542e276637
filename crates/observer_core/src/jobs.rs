use std::collections::HashMap;

use thiserror::Error;

use crate::{JobId, ResultEvent, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub job_id: JobId,
    pub session_id: SessionId,
    pub done: bool,
    pub snippet: String,
    pub output: Option<String>,
}

impl Job {
    fn pending(job_id: JobId, session_id: SessionId, snippet: String) -> Self {
        Self {
            job_id,
            session_id,
            done: false,
            snippet,
            output: None,
        }
    }

    fn from_event(event: &ResultEvent) -> Self {
        let mut job = Self::pending(
            event.job_id.clone(),
            event.session_id.clone(),
            event.snippet.clone(),
        );
        job.absorb(event);
        job
    }

    /// Folds a result into the job. The worker's snippet replaces the one
    /// recorded at submission. Once done, the job is frozen.
    fn absorb(&mut self, event: &ResultEvent) -> bool {
        if self.done {
            return false;
        }
        let mut changed = false;
        if !event.snippet.is_empty() && self.snippet != event.snippet {
            self.snippet = event.snippet.clone();
            changed = true;
        }
        let (done, output) = (event.done, event.output.as_str());
        if (done || !output.is_empty()) && self.output.as_deref() != Some(output) {
            self.output = Some(output.to_string());
            changed = true;
        }
        if done {
            self.done = true;
            changed = true;
        }
        changed
    }
}

/// Whether a job was seen for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    New,
    Known,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Inserted,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("job {job_id} belongs to session {recorded}, event claims {incoming}")]
    SessionMismatch {
        job_id: JobId,
        recorded: SessionId,
        incoming: SessionId,
    },
}

/// JobId -> Job, grows monotonically and remembers first-sight order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobTable {
    jobs: HashMap<JobId, Job>,
    order: Vec<JobId>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &JobId) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.jobs.contains_key(job_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Jobs in the order they were first seen.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Job> {
        self.order.iter().filter_map(|id| self.jobs.get(id))
    }

    /// Records a submission acknowledgement. A job already reconstructed from a
    /// result event keeps its state, snippet included.
    pub fn record_submission(
        &mut self,
        job_id: JobId,
        session_id: SessionId,
        snippet: String,
    ) -> Result<Sighting, CorrelationError> {
        if let Some(existing) = self.jobs.get(&job_id) {
            check_session(existing, &session_id)?;
            return Ok(Sighting::Known);
        }
        self.insert(Job::pending(job_id, session_id, snippet));
        Ok(Sighting::New)
    }

    pub fn apply_event(&mut self, event: &ResultEvent) -> Result<EventOutcome, CorrelationError> {
        match self.jobs.get_mut(&event.job_id) {
            Some(existing) => {
                check_session(existing, &event.session_id)?;
                if existing.absorb(event) {
                    Ok(EventOutcome::Updated)
                } else {
                    Ok(EventOutcome::Unchanged)
                }
            }
            None => {
                self.insert(Job::from_event(event));
                Ok(EventOutcome::Inserted)
            }
        }
    }

    fn insert(&mut self, job: Job) {
        self.order.push(job.job_id.clone());
        self.jobs.insert(job.job_id.clone(), job);
    }
}

fn check_session(job: &Job, incoming: &SessionId) -> Result<(), CorrelationError> {
    if &job.session_id == incoming {
        Ok(())
    } else {
        Err(CorrelationError::SessionMismatch {
            job_id: job.job_id.clone(),
            recorded: job.session_id.clone(),
            incoming: incoming.clone(),
        })
    }
}
