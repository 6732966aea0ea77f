//! Editor surfaces.
//!
//! One [`EditorSurface`] per buffer kind. A surface carries the language
//! tagging shown by the host page and the editing affordances that need the
//! authoritative buffer text (tab insertion). Every change goes straight to
//! the [`BufferStore`]; rendering is the scheduler's business.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::buffer::{BufferKind, BufferStore};

/// Default indent unit inserted by Tab.
pub const DEFAULT_TAB_WIDTH: u8 = 2;

/// A text selection as reported by the browser (`selectionStart` /
/// `selectionEnd`), in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Collapsed selection.
    pub const fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// Editing affordance for one language.
pub struct EditorSurface {
    kind: BufferKind,
    store: Arc<BufferStore>,
    indent: String,
}

impl EditorSurface {
    pub fn new(kind: BufferKind, store: Arc<BufferStore>) -> Self {
        Self {
            kind,
            store,
            indent: " ".repeat(DEFAULT_TAB_WIDTH as usize),
        }
    }

    /// Use `width` spaces per Tab.
    pub fn with_tab_width(mut self, width: u8) -> Self {
        self.indent = " ".repeat(width.max(1) as usize);
        self
    }

    /// Text inserted per Tab.
    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub const fn kind(&self) -> BufferKind {
        self.kind
    }

    /// CSS class used for syntax tagging.
    pub const fn language_class(&self) -> &'static str {
        match self.kind {
            BufferKind::Markup => "language-html",
            BufferKind::Style => "language-css",
            BufferKind::Script => "language-javascript",
        }
    }

    /// Short label of the language tab.
    pub const fn language_label(&self) -> &'static str {
        match self.kind {
            BufferKind::Markup => "HTML",
            BufferKind::Style => "CSS",
            BufferKind::Script => "JS",
        }
    }

    pub const fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    pub fn placeholder(&self) -> String {
        format!("Write your {} code here...", self.language_label())
    }

    pub fn text(&self) -> String {
        self.store.get(self.kind)
    }

    /// Push the editor's full text into the store.
    pub fn on_code_change(&self, text: impl Into<String>) -> bool {
        self.store.set(self.kind, text)
    }

    /// Replace `selection` with one indent unit.
    ///
    /// Returns the new caret position (UTF-16 code units), right after the
    /// inserted indent. Out-of-range selections are clamped to the text.
    pub fn insert_tab(&self, selection: Selection) -> usize {
        let text = self.text();
        let start = utf16_to_byte(&text, selection.start);
        let end = utf16_to_byte(&text, selection.end).max(start);

        let mut next = String::with_capacity(text.len() + self.indent.len());
        next.push_str(&text[..start]);
        next.push_str(&self.indent);
        next.push_str(&text[end..]);
        self.store.set(self.kind, next);

        utf16_len(&text[..start]) + self.indent.len()
    }
}

/// Byte offset of a UTF-16 offset, clamped to the text.
///
/// An offset pointing into the middle of a surrogate pair resolves to the
/// start of that character.
fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return byte;
        }
        units = next;
    }
    text.len()
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(kind: BufferKind, text: &str) -> EditorSurface {
        let store = Arc::new(BufferStore::default());
        store.set(kind, text);
        EditorSurface::new(kind, store)
    }

    #[test]
    fn test_language_tagging() {
        let store = Arc::new(BufferStore::default());
        let html = EditorSurface::new(BufferKind::Markup, Arc::clone(&store));
        let js = EditorSurface::new(BufferKind::Script, store);

        assert_eq!(html.language_class(), "language-html");
        assert_eq!(html.file_name(), "index.html");
        assert_eq!(js.language_class(), "language-javascript");
        assert_eq!(js.placeholder(), "Write your JS code here...");
    }

    #[test]
    fn test_tab_at_caret() {
        let editor = surface(BufferKind::Style, "p{\ncolor:red}");
        let caret = editor.insert_tab(Selection::caret(3));
        assert_eq!(editor.text(), "p{\n  color:red}");
        assert_eq!(caret, 5);
    }

    #[test]
    fn test_tab_replaces_selection() {
        let editor = surface(BufferKind::Script, "let x = 1;");
        let caret = editor.insert_tab(Selection::new(8, 3));
        assert_eq!(editor.text(), "let  1;");
        assert_eq!(caret, 5);
    }

    #[test]
    fn test_tab_clamps_out_of_range() {
        let editor = surface(BufferKind::Markup, "<p>");
        let caret = editor.insert_tab(Selection::new(10, 20));
        assert_eq!(editor.text(), "<p>  ");
        assert_eq!(caret, 5);
    }

    #[test]
    fn test_tab_counts_utf16_units() {
        // "é" is one UTF-16 unit (two bytes), "😀" is two units (four bytes)
        let editor = surface(BufferKind::Markup, "é😀x");
        let caret = editor.insert_tab(Selection::caret(3));
        assert_eq!(editor.text(), "é😀  x");
        assert_eq!(caret, 5);

        // Offset inside the surrogate pair snaps to the character start
        let editor = surface(BufferKind::Markup, "😀");
        editor.insert_tab(Selection::caret(1));
        assert_eq!(editor.text(), "  😀");
    }

    #[test]
    fn test_custom_tab_width() {
        let editor = surface(BufferKind::Style, "").with_tab_width(4);
        assert_eq!(editor.insert_tab(Selection::caret(0)), 4);
        assert_eq!(editor.text(), "    ");
    }

    #[test]
    fn test_on_code_change_updates_store() {
        let editor = surface(BufferKind::Markup, "");
        assert!(editor.on_code_change("<h1>Hi</h1>"));
        assert!(!editor.on_code_change("<h1>Hi</h1>"));
        assert_eq!(editor.text(), "<h1>Hi</h1>");
    }
}
