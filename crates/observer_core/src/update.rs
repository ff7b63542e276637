use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::JoinRequested {
            user,
            session,
            mode,
        } => state.join(&user, &session, mode),
        Msg::RegistryFetched(snapshot) => state.reconcile(snapshot),
        Msg::ContentEdited => {
            state.content_edited();
            Vec::new()
        }
        Msg::ExecuteRequested { content } => state.request_execution(content),
        Msg::SubmissionAccepted {
            job_id,
            session_id,
            snippet,
        } => state.submission_accepted(job_id, session_id, snippet),
        Msg::SubmissionFailed { reason } => state.submission_failed(reason),
        Msg::ResultArrived(event) => state.correlate(event),
        Msg::JobSelected { job_id } => state.select(job_id),
    };

    (state, effects)
}
