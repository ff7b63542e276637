use std::sync::{Arc, Mutex};

use observer_logging::{observer_info, observer_warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::poller::{poll_registry, poll_results, PollSettings};
use crate::{EngineEvent, WorkerApi};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Owns the background tasks talking to the server and worker.
///
/// Must be started from within a tokio runtime.
pub struct EngineHandle {
    api: Arc<dyn WorkerApi>,
    sink: Arc<dyn EventSink>,
    poll: PollSettings,
    shutdown: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl EngineHandle {
    /// Starts the registry poller immediately.
    pub fn start(api: Arc<dyn WorkerApi>, poll: PollSettings, sink: Arc<dyn EventSink>) -> Self {
        let handle = Self {
            api,
            sink,
            poll,
            shutdown: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        };

        let api = handle.api.clone();
        let sink = handle.sink.clone();
        let cancel = handle.shutdown.child_token();
        let interval = poll.registry_interval;
        handle.track(tokio::spawn(async move {
            poll_registry(api.as_ref(), interval, sink.as_ref(), cancel).await;
        }));
        handle
    }

    /// Begins polling result events for the joined session.
    pub fn start_results(&self, session_id: impl Into<String>) {
        let session_id = session_id.into();
        observer_info!("Starting result stream for session {}", session_id);
        let api = self.api.clone();
        let sink = self.sink.clone();
        let cancel = self.shutdown.child_token();
        let interval = self.poll.results_interval;
        self.track(tokio::spawn(async move {
            poll_results(api.as_ref(), &session_id, interval, sink.as_ref(), cancel).await;
        }));
    }

    /// Sends a snippet to the worker; the outcome arrives as an [`EngineEvent`].
    pub fn submit(&self, session_id: impl Into<String>, snippet: impl Into<String>) {
        let session_id = session_id.into();
        let snippet = snippet.into();
        let api = self.api.clone();
        let sink = self.sink.clone();
        self.track(tokio::spawn(async move {
            let event = match api.submit(&session_id, &snippet).await {
                Ok(job_id) => EngineEvent::SubmissionAccepted {
                    job_id,
                    session_id,
                    snippet,
                },
                Err(error) => {
                    observer_warn!("Submission for session {} failed: {}", session_id, error);
                    EngineEvent::SubmissionFailed { session_id, error }
                }
            };
            sink.emit(event);
        }));
    }

    /// Cancels the pollers and waits for every spawned task to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let tasks = match self.tasks.lock() {
            Ok(mut tasks) => std::mem::take(&mut *tasks),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for task in tasks {
            if let Err(err) = task.await {
                observer_warn!("Engine task ended abnormally: {}", err);
            }
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn track(&self, task: JoinHandle<()>) {
        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.retain(|task| !task.is_finished());
                tasks.push(task);
            }
            Err(poisoned) => poisoned.into_inner().push(task),
        }
    }
}
