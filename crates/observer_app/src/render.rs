use std::collections::HashMap;
use std::io::Write;

use chrono::Local;
use observer_core::{AppViewModel, JobId, Notice, SessionId, UserId};
use observer_logging::{observer_debug, observer_warn};

/// Presentation collaborator driven by core effects.
pub trait RenderSink {
    fn add_session_option(&mut self, session_id: &SessionId);
    fn add_user_option(&mut self, user_id: &UserId);
    /// Adds a log entry that can be activated with `select <job_id>`.
    fn add_job_entry(&mut self, job_id: &JobId);
    fn set_entry_selected(&mut self, job_id: &JobId, selected: bool);
    fn show_read_only(&mut self, title: &str, snippet: &str, output: &str);
    fn show_editable(&mut self, title: &str, content: &str);
    fn notify(&mut self, notice: &Notice);
    /// Free-form text such as help or command errors.
    fn message(&mut self, text: &str);
    fn status(&mut self, view: &AppViewModel);
}

/// Opaque per-entry handle owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHandle {
    position: usize,
    selected: bool,
}

/// Line-oriented renderer writing to any `Write`.
pub struct TerminalRenderer<W: Write> {
    out: W,
    entries: HashMap<JobId, EntryHandle>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn entry(&self, job_id: &JobId) -> Option<EntryHandle> {
        self.entries.get(job_id).copied()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let stamp = Local::now().format("%H:%M:%S");
        if let Err(err) = writeln!(self.out, "[{stamp}] {text}") {
            observer_warn!("Terminal write failed: {}", err);
        }
    }

    fn block(&mut self, text: &str) {
        for line in text.lines() {
            if let Err(err) = writeln!(self.out, "    {line}") {
                observer_warn!("Terminal write failed: {}", err);
                return;
            }
        }
    }
}

impl<W: Write> RenderSink for TerminalRenderer<W> {
    fn add_session_option(&mut self, session_id: &SessionId) {
        self.line(&format!("session available: {session_id}"));
    }

    fn add_user_option(&mut self, user_id: &UserId) {
        self.line(&format!("user known: {user_id}"));
    }

    fn add_job_entry(&mut self, job_id: &JobId) {
        if self.entries.contains_key(job_id) {
            observer_debug!("Entry for job {} already rendered", job_id);
            return;
        }
        let handle = EntryHandle {
            position: self.entries.len(),
            selected: false,
        };
        self.entries.insert(job_id.clone(), handle);
        self.line(&format!("job {job_id} logged (select {job_id} to inspect)"));
    }

    fn set_entry_selected(&mut self, job_id: &JobId, selected: bool) {
        match self.entries.get_mut(job_id) {
            Some(handle) if handle.selected == selected => {}
            Some(handle) => {
                observer_debug!(
                    "Entry #{} for job {} selected={}",
                    handle.position,
                    job_id,
                    selected
                );
                handle.selected = selected;
            }
            None => observer_warn!("No rendered entry for job {}", job_id),
        }
    }

    fn show_read_only(&mut self, title: &str, snippet: &str, output: &str) {
        self.line(&format!("*** {title} ***"));
        self.block(snippet);
        self.line("Output:");
        self.block(output);
    }

    fn show_editable(&mut self, title: &str, content: &str) {
        self.line(title);
        self.block(content);
    }

    fn notify(&mut self, notice: &Notice) {
        self.line(&format!("! {notice}"));
    }

    fn message(&mut self, text: &str) {
        self.block(text);
    }

    fn status(&mut self, view: &AppViewModel) {
        let session = view.session.as_deref().unwrap_or("-");
        let user = view.user.as_deref().unwrap_or("-");
        self.line(&format!(
            "user {user} | session {session} | jobs {} | run {}",
            view.job_count,
            if view.can_execute { "ready" } else { "blocked" }
        ));
        self.line(&format!("sessions: {}", view.sessions.join(", ")));
        self.line(&format!("users: {}", view.users.join(", ")));
        for row in &view.jobs {
            let marker = if row.selected { ">" } else { " " };
            let state = if row.done { "done" } else { "pending" };
            self.line(&format!("{marker} {} [{state}]", row.job_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(raw: &str) -> JobId {
        JobId::parse(raw).unwrap()
    }

    fn rendered(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn job_entry_is_rendered_once() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.add_job_entry(&job("j1"));
        renderer.add_job_entry(&job("j1"));

        assert_eq!(
            renderer.entry(&job("j1")),
            Some(EntryHandle {
                position: 0,
                selected: false
            })
        );
        assert_eq!(rendered(renderer).matches("job j1 logged").count(), 1);
    }

    #[test]
    fn selection_marks_the_handle() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.add_job_entry(&job("j1"));
        renderer.set_entry_selected(&job("j1"), true);
        assert!(renderer.entry(&job("j1")).unwrap().selected);
        renderer.set_entry_selected(&job("j1"), false);
        assert!(!renderer.entry(&job("j1")).unwrap().selected);
    }

    #[test]
    fn read_only_view_prints_snippet_and_output() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.show_read_only("Snippet: READ ONLY", "print(42)", "42\n");
        let text = rendered(renderer);
        assert!(text.contains("*** Snippet: READ ONLY ***"));
        assert!(text.contains("    print(42)"));
        assert!(text.contains("    42"));
    }
}
