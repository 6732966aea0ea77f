//! Document composition.
//!
//! Merges the three buffers into one self-contained document:
//!
//! ```text
//! Snapshot { markup, style, script }
//!        │
//!        ├─ complete document ──→ replace/inject <style> and <script> in place
//!        └─ fragment ───────────→ extract <body> content, wrap in skeleton
//!        │
//!        └─ error runtime in head + guarded user script at end of body
//! ```
//!
//! Composition is a pure function of the snapshot and the static
//! [`ComposeOptions`]: nothing random, time based, or carried over.

mod markup;
mod script;

pub use markup::{DocumentShape, extract_body, shape};
pub use script::{REPORT_HOOK, guard_script};

use markup::{Edit, Scan};

use crate::buffer::Snapshot;
use crate::config::PreviewConfig;
use crate::embed::preview::RUNTIME_JS;
use crate::utils::html::escape;

/// Baseline reset prepended to user styles in fragment documents.
const RESET_CSS: &str = "*, *::before, *::after {\n  box-sizing: border-box;\n}\n\nbody {\n  margin: 0;\n  padding: 0;\n  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;\n}";

/// Static knobs for the fragment skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// `<title>` of fragment documents.
    pub title: String,
    /// Prepend [`RESET_CSS`] to the user style in fragment documents.
    pub reset: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            title: "Preview".to_string(),
            reset: true,
        }
    }
}

impl ComposeOptions {
    pub fn from_config(preview: &PreviewConfig) -> Self {
        Self {
            title: preview.title.clone(),
            reset: preview.reset,
        }
    }

    /// Compose a renderable document from a buffer snapshot.
    pub fn compose(&self, snapshot: &Snapshot) -> String {
        match shape(&snapshot.markup) {
            DocumentShape::Complete => compose_complete(snapshot),
            DocumentShape::Fragment => self.compose_fragment(snapshot),
        }
    }

    fn compose_fragment(&self, snapshot: &Snapshot) -> String {
        let body = extract_body(&snapshot.markup).unwrap_or(&snapshot.markup);
        let style = script::escape_style(&snapshot.style);
        let guarded = guard_script(&snapshot.script);
        let reset = if self.reset { RESET_CSS } else { "" };

        let mut doc = String::with_capacity(
            body.len() + style.len() + guarded.len() + RUNTIME_JS.len() + 512,
        );
        doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        doc.push_str("<meta charset=\"UTF-8\">\n");
        doc.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        doc.push_str("<title>");
        doc.push_str(&escape(&self.title));
        doc.push_str("</title>\n");
        doc.push_str(&runtime_block());
        doc.push_str("<style>\n");
        doc.push_str(reset);
        doc.push('\n');
        doc.push_str(&style);
        doc.push_str("\n</style>\n</head>\n<body>\n");
        doc.push_str(body);
        doc.push_str("\n<script>\n");
        doc.push_str(&guarded);
        doc.push_str("\n</script>\n</body>\n</html>\n");
        doc
    }
}

/// Compose with default options.
pub fn compose(snapshot: &Snapshot) -> String {
    ComposeOptions::default().compose(snapshot)
}

/// Complete documents keep the author's skeleton: the first inline style and
/// executable script blocks receive the buffers, extra ones are dropped, and
/// missing blocks are injected at fixed anchors. Comments, external scripts
/// and data blocks are left as written.
fn compose_complete(snapshot: &Snapshot) -> String {
    let source = &snapshot.markup;
    let style = script::escape_style(&snapshot.style);
    let guarded = guard_script(&snapshot.script);

    let scan = Scan::new(source);
    let mut edits = vec![Edit::insert(scan.runtime_anchor(), runtime_block())];

    let styles = scan.styles();
    match styles.split_first() {
        Some((first, rest)) => {
            edits.push(Edit::replace(first.content.clone(), format!("\n{style}\n")));
            edits.extend(rest.iter().map(|block| Edit::remove(block.whole.clone())));
        }
        None => edits.push(Edit::insert(
            scan.style_anchor(),
            format!("<style>\n{style}\n</style>\n"),
        )),
    }

    let scripts = scan.inline_scripts();
    match scripts.split_first() {
        Some((first, rest)) => {
            edits.push(Edit::replace(first.content.clone(), format!("\n{guarded}\n")));
            edits.extend(rest.iter().map(|block| Edit::remove(block.whole.clone())));
        }
        None => edits.push(Edit::insert(
            scan.script_anchor(),
            format!("<script>\n{guarded}\n</script>\n"),
        )),
    }

    markup::splice(source, edits)
}

fn runtime_block() -> String {
    format!("<script>{RUNTIME_JS}</script>\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests;
