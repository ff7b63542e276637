//! Single owner of the client state.
//!
//! Every input (terminal command or transport event) is handled to completion
//! before the next one is taken, so the core state never needs a lock.

use observer_core::{update, AppState, Effect, Msg, TITLE_EDITING, TITLE_READ_ONLY};
use observer_engine::EngineEvent;
use observer_logging::{observer_debug, observer_info, observer_warn};
use tokio::sync::mpsc;

use crate::commands::{self, Command, HELP};
use crate::editor::{BufferEditor, Editor};
use crate::effects::{map_event, JobDispatcher};
use crate::render::RenderSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Coordinator<R: RenderSink, D: JobDispatcher> {
    state: AppState,
    editor: BufferEditor,
    renderer: R,
    dispatcher: D,
}

impl<R: RenderSink, D: JobDispatcher> Coordinator<R, D> {
    pub fn new(renderer: R, dispatcher: D) -> Self {
        Self {
            state: AppState::new(),
            editor: BufferEditor::new(),
            renderer,
            dispatcher,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn editor(&self) -> &BufferEditor {
        &self.editor
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Runs until `quit`, end of input, or Ctrl-C.
    pub async fn run(
        mut self,
        mut lines: mpsc::UnboundedReceiver<String>,
        mut engine_events: mpsc::UnboundedReceiver<EngineEvent>,
    ) -> Self {
        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => {
                        if self.handle_line(&line) == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        observer_info!("Input closed");
                        break;
                    }
                },
                event = engine_events.recv() => match event {
                    Some(event) => self.handle_engine_event(event),
                    None => {
                        observer_warn!("Engine event channel closed");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    observer_info!("Interrupted");
                    break;
                }
            }
        }
        self
    }

    pub fn handle_line(&mut self, line: &str) -> Flow {
        match commands::parse(line) {
            Ok(Some(command)) => self.handle_command(command),
            Ok(None) => Flow::Continue,
            Err(err) => {
                self.renderer.message(&err.to_string());
                Flow::Continue
            }
        }
    }

    pub fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Join {
                user,
                session,
                mode,
            } => self.dispatch(Msg::JoinRequested {
                user,
                session,
                mode,
            }),
            Command::Edit(content) => {
                if self.editor.edit(&content) {
                    self.dispatch(Msg::ContentEdited);
                }
            }
            Command::Run => {
                let content = self.editor.current_content();
                self.dispatch(Msg::ExecuteRequested { content });
            }
            Command::Select(job_id) => self.dispatch(Msg::JobSelected { job_id }),
            Command::Status => {
                let view = self.state.view();
                self.renderer.status(&view);
                let title = if self.editor.is_read_only() {
                    view.title
                } else {
                    TITLE_EDITING
                };
                self.renderer.show_editable(title, self.editor.displayed());
            }
            Command::Help => self.renderer.message(HELP),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if let Some(msg) = map_event(event) {
            self.dispatch(msg);
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            observer_debug!("State changed, applying {} effects", effects.len());
        }
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::AddSessionOption(session_id) => self.renderer.add_session_option(&session_id),
            Effect::AddUserOption(user_id) => self.renderer.add_user_option(&user_id),
            Effect::StartResultStream { session_id } => {
                self.dispatcher.start_results(&session_id)
            }
            Effect::SubmitJob {
                session_id,
                snippet,
            } => self.dispatcher.submit(&session_id, &snippet),
            Effect::AddJobEntry { job_id } => self.renderer.add_job_entry(&job_id),
            Effect::MarkEntry { job_id } => self.renderer.set_entry_selected(&job_id, true),
            Effect::UnmarkEntry { job_id } => self.renderer.set_entry_selected(&job_id, false),
            Effect::ShowResult {
                snippet, output, ..
            } => {
                self.editor.install(&snippet, true);
                self.renderer.show_read_only(TITLE_READ_ONLY, &snippet, &output);
            }
            Effect::ShowEditable => {
                let content = self.editor.current_content();
                self.editor.install(&content, false);
                self.renderer.show_editable(TITLE_EDITING, &content);
            }
            Effect::Notify(notice) => self.renderer.notify(&notice),
        }
    }
}
