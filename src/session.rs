//! Playground session: the state one dev server instance edits.
//!
//! Translates host page messages and workspace changes into buffer
//! mutations. Rendering is never triggered from here directly; the
//! scheduler observes the store.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::{BufferKind, BufferStore};
use crate::editor::{EditorSurface, Selection};
use crate::exercise::{Catalog, Exercise};
use crate::reload::message::{ClientMessage, PreviewMessage};
use crate::sandbox::PreviewSandbox;
use crate::workspace::Workspace;
use crate::{debug, log};

pub struct Session {
    store: Arc<BufferStore>,
    sandbox: Arc<PreviewSandbox>,
    catalog: Catalog,
    current: Mutex<Exercise>,
    /// One surface per kind, in `BufferKind::ALL` order.
    editors: [EditorSurface; 3],
    workspace: Option<Workspace>,
}

impl Session {
    pub fn new(
        store: Arc<BufferStore>,
        sandbox: Arc<PreviewSandbox>,
        catalog: Catalog,
        exercise: Exercise,
        tab_width: u8,
    ) -> Self {
        let editors = BufferKind::ALL
            .map(|kind| EditorSurface::new(kind, Arc::clone(&store)).with_tab_width(tab_width));
        Self {
            store,
            sandbox,
            catalog,
            current: Mutex::new(exercise),
            editors,
            workspace: None,
        }
    }

    /// Mirror workspace file changes into the buffers.
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn store(&self) -> &Arc<BufferStore> {
        &self.store
    }

    pub fn sandbox(&self) -> &Arc<PreviewSandbox> {
        &self.sandbox
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn editor(&self, kind: BufferKind) -> &EditorSurface {
        let [markup, style, script] = &self.editors;
        match kind {
            BufferKind::Markup => markup,
            BufferKind::Style => style,
            BufferKind::Script => script,
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.current.lock().clone()
    }

    /// Everything a freshly connected host page needs to catch up.
    pub fn greeting(&self) -> Vec<PreviewMessage> {
        let mut messages = vec![
            PreviewMessage::connected(
                self.sandbox.policy().to_attribute(),
                self.editor(BufferKind::Script).indent(),
            ),
            PreviewMessage::exercise(self.exercise()),
        ];
        messages.extend(self.buffer_messages());
        if let Some(document) = self.sandbox.last_document() {
            messages.push(PreviewMessage::render(&document));
        }
        messages
    }

    /// Apply a host page message. Returns messages to broadcast.
    pub fn handle_client(&self, msg: ClientMessage) -> Vec<PreviewMessage> {
        match msg {
            ClientMessage::Edit { kind, text } => {
                self.editor(kind).on_code_change(text);
                Vec::new()
            }
            ClientMessage::Indent { kind, start, end } => {
                let editor = self.editor(kind);
                let caret = editor.insert_tab(Selection::new(start, end));
                vec![PreviewMessage::buffer_with_cursor(kind, editor.text(), caret)]
            }
            ClientMessage::Refresh => {
                self.sandbox.refresh();
                Vec::new()
            }
            ClientMessage::Fullscreen { enabled } => {
                self.sandbox.set_fullscreen(enabled);
                Vec::new()
            }
            ClientMessage::Load { id } => self.load_exercise(&id),
            ClientMessage::Report { message } => {
                log!("preview"; "{}", message);
                Vec::new()
            }
        }
    }

    /// Replace all buffers with an exercise's starter code.
    ///
    /// Unknown ids fall back to the demo lesson.
    pub fn load_exercise(&self, id: &str) -> Vec<PreviewMessage> {
        let exercise = match self.catalog.resolve(id) {
            Ok(exercise) => exercise.clone(),
            Err(e) => {
                log!("exercise"; "{}", e);
                return Vec::new();
            }
        };

        log!("exercise"; "loaded `{}`", exercise.id);
        self.store.load(exercise.snapshot());
        *self.current.lock() = exercise.clone();

        let mut messages = vec![PreviewMessage::exercise(exercise)];
        messages.extend(self.buffer_messages());
        messages
    }

    /// Re-read changed workspace files into the buffers.
    ///
    /// Returns one `buffer` message per buffer whose text actually changed.
    pub fn files_changed(&self, paths: &[PathBuf]) -> Vec<PreviewMessage> {
        let Some(workspace) = &self.workspace else {
            return Vec::new();
        };

        let mut kinds: Vec<BufferKind> = paths.iter().filter_map(|p| workspace.owns(p)).collect();
        kinds.sort_by_key(|kind| *kind as u8);
        kinds.dedup();

        let mut messages = Vec::new();
        for kind in kinds {
            match workspace.read(kind) {
                Ok(text) => {
                    if self.store.set(kind, text.clone()) {
                        debug!("watch"; "{} changed on disk", kind.file_name());
                        messages.push(PreviewMessage::buffer(kind, text));
                    }
                }
                Err(e) => log!("watch"; "{:#}", anyhow::Error::from(e)),
            }
        }
        messages
    }

    fn buffer_messages(&self) -> impl Iterator<Item = PreviewMessage> + '_ {
        BufferKind::ALL
            .into_iter()
            .map(|kind| PreviewMessage::buffer(kind, self.store.get(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Snapshot;
    use crate::compose::ComposeOptions;
    use crate::exercise::DEMO_ID;
    use crate::sandbox::RecordingTarget;
    use crate::scheduler::RenderScheduler;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        session: Session,
        scheduler: Arc<RenderScheduler>,
        recorder: RecordingTarget,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(BufferStore::default());
        let sandbox = Arc::new(PreviewSandbox::default());
        let recorder = RecordingTarget::default();
        sandbox.mount(Box::new(recorder.clone()));

        let scheduler = RenderScheduler::new(
            Arc::clone(&store),
            Arc::clone(&sandbox),
            ComposeOptions::default(),
        );
        scheduler.attach();

        let catalog = Catalog::builtin();
        let exercise = catalog.get(DEMO_ID).cloned().unwrap();
        let session = Session::new(store, sandbox, catalog, exercise, 2);
        Fixture {
            session,
            scheduler,
            recorder,
        }
    }

    #[test]
    fn test_load_exercise_renders_once() {
        let f = fixture();
        let messages = f.session.load_exercise("html-basics");
        f.scheduler.run_pending();

        assert_eq!(f.recorder.documents().len(), 1);
        assert!(f.recorder.documents()[0].contains("<h1>Hello World</h1>"));
        assert_eq!(f.session.exercise().id, "html-basics");

        // exercise + three buffers
        assert_eq!(messages.len(), 4);
        assert!(matches!(&messages[0], PreviewMessage::Exercise { exercise } if exercise.id == "html-basics"));
    }

    #[test]
    fn test_load_unknown_falls_back_to_demo() {
        let f = fixture();
        f.session.load_exercise("does-not-exist");
        assert_eq!(f.session.exercise().id, DEMO_ID);
        assert!(f.session.store().get(BufferKind::Markup).contains("card"));
    }

    #[test]
    fn test_edit_updates_buffer() {
        let f = fixture();
        let replies = f.session.handle_client(ClientMessage::Edit {
            kind: BufferKind::Style,
            text: "p{color:red}".into(),
        });
        assert!(replies.is_empty());
        assert_eq!(f.session.store().get(BufferKind::Style), "p{color:red}");
    }

    #[test]
    fn test_indent_replies_with_caret() {
        let f = fixture();
        f.session.store().set(BufferKind::Script, "ab");

        let replies = f.session.handle_client(ClientMessage::Indent {
            kind: BufferKind::Script,
            start: 1,
            end: 1,
        });
        assert_eq!(
            replies,
            vec![PreviewMessage::buffer_with_cursor(BufferKind::Script, "a  b", 3)]
        );
    }

    #[test]
    fn test_local_indent_then_typing_keeps_client_text() {
        let f = fixture();
        f.session.store().set(BufferKind::Script, "ab");

        // The host page inserts the indent itself, then keeps typing
        // before anything comes back from the server
        let mut replies = f.session.handle_client(ClientMessage::Edit {
            kind: BufferKind::Script,
            text: "a  b".into(),
        });
        replies.extend(f.session.handle_client(ClientMessage::Edit {
            kind: BufferKind::Script,
            text: "a  xb".into(),
        }));
        f.scheduler.run_pending();

        // No buffer reply races the editor, and store and preview agree with it
        assert!(replies.is_empty());
        assert_eq!(f.session.store().get(BufferKind::Script), "a  xb");
        assert!(f.recorder.documents()[0].contains("a  xb"));
    }

    #[test]
    fn test_greeting_carries_indent_unit() {
        let f = fixture();
        let greeting = f.session.greeting();
        assert!(matches!(&greeting[0], PreviewMessage::Connected { indent, .. } if indent == "  "));
    }

    #[test]
    fn test_refresh_and_fullscreen_reach_target() {
        let f = fixture();
        f.session.store().set(BufferKind::Markup, "<p>x</p>");
        f.scheduler.run_pending();

        f.session.handle_client(ClientMessage::Refresh);
        f.session
            .handle_client(ClientMessage::Fullscreen { enabled: true });

        assert_eq!(f.recorder.documents().len(), 2);
        assert_eq!(*f.recorder.fullscreen.lock(), vec![true]);
    }

    #[test]
    fn test_greeting_catches_up_new_client() {
        let f = fixture();
        f.session.store().load(Snapshot::new("<p>Hi</p>", "", ""));
        f.scheduler.run_pending();

        let greeting = f.session.greeting();
        assert!(matches!(&greeting[0], PreviewMessage::Connected { sandbox, .. } if sandbox.contains("allow-scripts")));
        assert!(matches!(greeting.last(), Some(PreviewMessage::Render { document }) if document.contains("<p>Hi</p>")));
        // connected + exercise + three buffers + render
        assert_eq!(greeting.len(), 6);
    }

    #[test]
    fn test_files_changed_syncs_owned_files() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path());
        fs::write(workspace.path(BufferKind::Style), "h1{}").unwrap();
        fs::write(temp.path().join("notes.md"), "ignored").unwrap();

        let f = fixture();
        let session = f.session.with_workspace(workspace.clone());

        let paths = vec![
            workspace.path(BufferKind::Style),
            workspace.path(BufferKind::Style),
            temp.path().join("notes.md"),
        ];
        let messages = session.files_changed(&paths);
        assert_eq!(messages, vec![PreviewMessage::buffer(BufferKind::Style, "h1{}")]);
        assert_eq!(session.store().get(BufferKind::Style), "h1{}");

        // Unchanged content produces no echo
        assert!(session.files_changed(&paths).is_empty());
    }
}
