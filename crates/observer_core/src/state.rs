use observer_logging::{observer_debug, observer_info, observer_warn};

use crate::view_model::{AppViewModel, JobRowView, TITLE_EDITING, TITLE_READ_ONLY};
use crate::{
    Effect, EventOutcome, IdError, Job, JobId, JobTable, JoinMode, Notice, Registry,
    RegistrySnapshot, ResultEvent, SessionId, Sighting, UserId,
};

/// Which content is currently presented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Editing,
    Inspecting(JobId),
}

/// Guard against re-running unchanged content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionGate {
    open: bool,
}

impl Default for ExecutionGate {
    fn default() -> Self {
        Self { open: true }
    }
}

impl ExecutionGate {
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn open(&mut self) {
        self.open = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    user: Option<UserId>,
    session: Option<SessionId>,
    sessions: Registry<SessionId>,
    users: Registry<UserId>,
    jobs: JobTable,
    view: ViewState,
    gate: ExecutionGate,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    pub fn active_user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn sessions(&self) -> &Registry<SessionId> {
        &self.sessions
    }

    pub fn users(&self) -> &Registry<UserId> {
        &self.users
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn job(&self, job_id: &JobId) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn gate(&self) -> ExecutionGate {
        self.gate
    }

    pub fn view(&self) -> AppViewModel {
        let selected = match &self.view {
            ViewState::Inspecting(job_id) => Some(job_id.clone()),
            ViewState::Editing => None,
        };
        let jobs = self
            .jobs
            .iter()
            .rev()
            .map(|job| JobRowView {
                job_id: job.job_id.clone(),
                done: job.done,
                selected: selected.as_ref() == Some(&job.job_id),
            })
            .collect();
        let read_only = selected.is_some();

        AppViewModel {
            user: self.user.as_ref().map(ToString::to_string),
            session: self.session.as_ref().map(ToString::to_string),
            sessions: self.sessions.iter().map(ToString::to_string).collect(),
            users: self.users.iter().map(ToString::to_string).collect(),
            job_count: self.jobs.len(),
            jobs,
            selected_job: selected,
            title: if read_only { TITLE_READ_ONLY } else { TITLE_EDITING },
            read_only,
            can_execute: self.session.is_some() && self.gate.is_open(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn join(&mut self, user: &str, session: &str, mode: JoinMode) -> Vec<Effect> {
        if let Some(active) = &self.session {
            return vec![Effect::Notify(Notice::AlreadyJoined {
                session_id: active.clone(),
            })];
        }
        let (user, session) = match (UserId::parse(user.trim()), SessionId::parse(session.trim())) {
            (Ok(user), Ok(session)) => (user, session),
            (Err(err), _) | (_, Err(err)) => return vec![join_rejected(&err)],
        };
        let known = self.sessions.contains(&session);
        match mode {
            JoinMode::New if known => {
                return vec![Effect::Notify(Notice::JoinRejected {
                    reason: "Session ID is already taken, please enter a unique Session ID"
                        .to_string(),
                })];
            }
            JoinMode::Existing if !known => {
                return vec![Effect::Notify(Notice::JoinRejected {
                    reason: format!("Session {session} is not listed yet"),
                })];
            }
            JoinMode::New | JoinMode::Existing => {}
        }

        observer_info!("Joined session={} as user={}", session, user);
        self.user = Some(user);
        self.session = Some(session.clone());
        self.mark_dirty();
        vec![Effect::StartResultStream { session_id: session }]
    }

    pub(crate) fn reconcile(&mut self, snapshot: RegistrySnapshot) -> Vec<Effect> {
        let sessions = parse_all(snapshot.sessions, |raw| SessionId::parse(raw));
        let users = parse_all(snapshot.users, |raw| UserId::parse(raw));

        let mut effects: Vec<Effect> = self
            .sessions
            .merge(sessions)
            .into_iter()
            .map(Effect::AddSessionOption)
            .collect();
        effects.extend(self.users.merge(users).into_iter().map(Effect::AddUserOption));

        if !effects.is_empty() {
            observer_debug!("Registry merge added {} entries", effects.len());
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn content_edited(&mut self) {
        if !self.gate.is_open() {
            self.gate.open();
            self.mark_dirty();
        }
    }

    pub(crate) fn request_execution(&mut self, content: String) -> Vec<Effect> {
        let Some(session_id) = self.session.clone() else {
            return vec![Effect::Notify(Notice::NoActiveSession)];
        };
        if !self.gate.is_open() {
            return vec![Effect::Notify(Notice::NoEditsSinceLastRun)];
        }
        self.gate.close();
        self.mark_dirty();
        vec![Effect::SubmitJob {
            session_id,
            snippet: content,
        }]
    }

    pub(crate) fn submission_accepted(
        &mut self,
        job_id: JobId,
        session_id: SessionId,
        snippet: String,
    ) -> Vec<Effect> {
        match self
            .jobs
            .record_submission(job_id.clone(), session_id, snippet)
        {
            Ok(Sighting::New) => {
                observer_info!("Job {} pending", job_id);
                self.mark_dirty();
                vec![Effect::AddJobEntry { job_id }]
            }
            Ok(Sighting::Known) => {
                observer_debug!("Submission ack for already known job {}", job_id);
                Vec::new()
            }
            Err(err) => {
                observer_warn!("Ignoring submission ack: {}", err);
                Vec::new()
            }
        }
    }

    pub(crate) fn submission_failed(&mut self, reason: String) -> Vec<Effect> {
        observer_warn!("Submission failed: {}", reason);
        self.gate.open();
        self.mark_dirty();
        vec![Effect::Notify(Notice::SubmissionFailed { reason })]
    }

    pub(crate) fn correlate(&mut self, event: ResultEvent) -> Vec<Effect> {
        if self.session.as_ref() != Some(&event.session_id) {
            observer_debug!(
                "Discarding result for job {} of session {}",
                event.job_id,
                event.session_id
            );
            return Vec::new();
        }

        match self.jobs.apply_event(&event) {
            Ok(EventOutcome::Inserted) => {
                observer_info!("Job {} first seen via result event", event.job_id);
                self.mark_dirty();
                vec![Effect::AddJobEntry {
                    job_id: event.job_id,
                }]
            }
            Ok(EventOutcome::Updated) => {
                self.mark_dirty();
                if self.view == ViewState::Inspecting(event.job_id.clone()) {
                    self.show_result_effects(&event.job_id)
                } else {
                    Vec::new()
                }
            }
            Ok(EventOutcome::Unchanged) => Vec::new(),
            Err(err) => {
                observer_warn!("Ignoring result event: {}", err);
                Vec::new()
            }
        }
    }

    pub(crate) fn select(&mut self, job_id: JobId) -> Vec<Effect> {
        if !self.jobs.contains(&job_id) {
            observer_warn!("Selection of untracked job {} ignored", job_id);
            return Vec::new();
        }

        let previous = std::mem::take(&mut self.view);
        self.mark_dirty();
        match previous {
            ViewState::Inspecting(current) if current == job_id => {
                vec![Effect::UnmarkEntry { job_id }, Effect::ShowEditable]
            }
            ViewState::Inspecting(current) => {
                let mut effects = vec![
                    Effect::UnmarkEntry { job_id: current },
                    Effect::MarkEntry {
                        job_id: job_id.clone(),
                    },
                ];
                effects.extend(self.show_result_effects(&job_id));
                self.view = ViewState::Inspecting(job_id);
                effects
            }
            ViewState::Editing => {
                let mut effects = vec![Effect::MarkEntry {
                    job_id: job_id.clone(),
                }];
                effects.extend(self.show_result_effects(&job_id));
                self.view = ViewState::Inspecting(job_id);
                effects
            }
        }
    }

    fn show_result_effects(&self, job_id: &JobId) -> Vec<Effect> {
        self.jobs
            .get(job_id)
            .map(|job| Effect::ShowResult {
                job_id: job.job_id.clone(),
                snippet: job.snippet.clone(),
                output: job.output.clone().unwrap_or_default(),
            })
            .into_iter()
            .collect()
    }
}

fn parse_all<T>(raw: Vec<String>, parse: impl Fn(String) -> Result<T, IdError>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|entry| match parse(entry) {
            Ok(id) => Some(id),
            Err(err) => {
                observer_warn!("Skipping registry entry: {}", err);
                None
            }
        })
        .collect()
}

fn join_rejected(err: &IdError) -> Effect {
    Effect::Notify(Notice::JoinRejected {
        reason: err.to_string(),
    })
}
