use std::sync::Once;

use observer_core::{
    update, AppState, Effect, JobId, JoinMode, Msg, ResultEvent, SessionId, ViewState,
    TITLE_EDITING, TITLE_READ_ONLY,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(observer_logging::initialize_for_tests);
}

fn job_id(raw: &str) -> JobId {
    JobId::parse(raw).unwrap()
}

fn done(job: &str, snippet: &str, output: &str) -> Msg {
    Msg::ResultArrived(ResultEvent {
        job_id: job_id(job),
        session_id: SessionId::parse("s1").unwrap(),
        done: true,
        snippet: snippet.to_string(),
        output: output.to_string(),
    })
}

fn with_two_jobs() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::JoinRequested {
            user: "alice".to_string(),
            session: "s1".to_string(),
            mode: JoinMode::New,
        },
    );
    let (state, _) = update(state, done("j1", "print(1)", "1"));
    let (state, _) = update(state, done("j2", "print(2)", "2"));
    state
}

fn select(state: AppState, job: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::JobSelected { job_id: job_id(job) })
}

#[test]
fn selecting_a_job_shows_it_read_only() {
    init_logging();
    let (state, effects) = select(with_two_jobs(), "j1");

    assert_eq!(
        effects,
        vec![
            Effect::MarkEntry { job_id: job_id("j1") },
            Effect::ShowResult {
                job_id: job_id("j1"),
                snippet: "print(1)".to_string(),
                output: "1".to_string(),
            },
        ]
    );
    assert_eq!(state.view_state(), &ViewState::Inspecting(job_id("j1")));
    let view = state.view();
    assert_eq!(view.title, TITLE_READ_ONLY);
    assert!(view.read_only);
    assert_eq!(view.selected_job, Some(job_id("j1")));
}

#[test]
fn reselecting_the_same_job_returns_to_editing() {
    init_logging();
    let (state, _) = select(with_two_jobs(), "j1");
    let (state, effects) = select(state, "j1");

    assert_eq!(
        effects,
        vec![
            Effect::UnmarkEntry { job_id: job_id("j1") },
            Effect::ShowEditable,
        ]
    );
    assert_eq!(state.view_state(), &ViewState::Editing);
    let view = state.view();
    assert_eq!(view.title, TITLE_EDITING);
    assert!(!view.read_only);
    assert!(view.jobs.iter().all(|row| !row.selected));
}

#[test]
fn selecting_another_job_moves_the_single_marker() {
    init_logging();
    let (state, _) = select(with_two_jobs(), "j1");
    let (state, effects) = select(state, "j2");

    assert_eq!(
        effects,
        vec![
            Effect::UnmarkEntry { job_id: job_id("j1") },
            Effect::MarkEntry { job_id: job_id("j2") },
            Effect::ShowResult {
                job_id: job_id("j2"),
                snippet: "print(2)".to_string(),
                output: "2".to_string(),
            },
        ]
    );
    assert_eq!(state.view_state(), &ViewState::Inspecting(job_id("j2")));
    let selected: Vec<_> = state
        .view()
        .jobs
        .into_iter()
        .filter(|row| row.selected)
        .map(|row| row.job_id)
        .collect();
    assert_eq!(selected, vec![job_id("j2")]);
}

#[test]
fn selecting_an_untracked_job_is_ignored() {
    init_logging();
    let mut state = with_two_jobs();
    state.consume_dirty();
    let before = state.clone();

    let (state, effects) = select(state, "ghost");
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn output_arriving_for_inspected_job_refreshes_display() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::JoinRequested {
            user: "alice".to_string(),
            session: "s1".to_string(),
            mode: JoinMode::New,
        },
    );
    let (state, _) = update(
        state,
        Msg::SubmissionAccepted {
            job_id: job_id("j1"),
            session_id: SessionId::parse("s1").unwrap(),
            snippet: "sleep(1)".to_string(),
        },
    );
    let (state, effects) = select(state, "j1");
    assert!(effects.contains(&Effect::ShowResult {
        job_id: job_id("j1"),
        snippet: "sleep(1)".to_string(),
        output: String::new(),
    }));

    let (_, effects) = update(state, done("j1", "sleep(1)", "slept"));
    assert_eq!(
        effects,
        vec![Effect::ShowResult {
            job_id: job_id("j1"),
            snippet: "sleep(1)".to_string(),
            output: "slept".to_string(),
        }]
    );
}

#[test]
fn editing_while_inspecting_keeps_view_but_reopens_gate() {
    init_logging();
    let (state, _) = update(
        with_two_jobs(),
        Msg::ExecuteRequested {
            content: "x".to_string(),
        },
    );
    let (state, _) = select(state, "j2");
    let (state, effects) = update(state, Msg::ContentEdited);

    assert!(effects.is_empty());
    assert!(state.gate().is_open());
    assert_eq!(state.view_state(), &ViewState::Inspecting(job_id("j2")));
}
