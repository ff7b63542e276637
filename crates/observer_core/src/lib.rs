//! Observer core: pure state machine for registry reconciliation, job
//! tracking, result correlation and the editing/inspecting view.
mod effect;
mod ids;
mod jobs;
mod msg;
mod registry;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notice};
pub use ids::{IdError, JobId, SessionId, UserId};
pub use jobs::{CorrelationError, EventOutcome, Job, JobTable, Sighting};
pub use msg::{JoinMode, Msg, RegistrySnapshot, ResultEvent};
pub use registry::Registry;
pub use state::{AppState, ExecutionGate, ViewState};
pub use update::update;
pub use view_model::{AppViewModel, JobRowView, TITLE_EDITING, TITLE_READ_ONLY};
