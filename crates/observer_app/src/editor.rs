/// The editing surface the client drives.
pub trait Editor {
    /// Current live content of the shared document.
    fn current_content(&self) -> String;
    /// Replace the displayed content, optionally locking it.
    fn install(&mut self, content: &str, read_only: bool);
}

/// In-memory editor backing the terminal client.
///
/// The live document and the displayed text are kept apart so that showing a
/// past job never touches what the user is editing.
#[derive(Debug, Default)]
pub struct BufferEditor {
    live: String,
    displayed: String,
    read_only: bool,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a user edit to the live document. Returns false if nothing changed.
    pub fn edit(&mut self, content: &str) -> bool {
        if self.live == content {
            return false;
        }
        self.live = content.to_string();
        if !self.read_only {
            self.displayed = self.live.clone();
        }
        true
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl Editor for BufferEditor {
    fn current_content(&self) -> String {
        self.live.clone()
    }

    fn install(&mut self, content: &str, read_only: bool) {
        self.displayed = content.to_string();
        self.read_only = read_only;
    }
}
