//! Observer engine: HTTP transport to the server and worker, plus the
//! cancellable pollers that feed the core.
mod client;
mod engine;
mod poller;
mod types;

pub use client::{ClientSettings, ReqwestWorkerClient, WorkerApi};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use poller::{poll_registry, poll_results, PollSettings};
pub use types::{
    EngineEvent, FailureKind, FetchError, JobRecord, RegistryListing, ResultRecord, SubmitResponse,
};
