//! Preview Channel Message Protocol
//!
//! JSON messages exchanged over the WebSocket between the dev server and the
//! host page. Every message carries a `type` tag.
//!
//! # Server → client
//!
//! - `connected`: handshake, carries the iframe sandbox attribute and the
//!   indent unit
//! - `render`: replace the preview with a new document
//! - `buffer`: replace one editor's text (optionally moving the caret)
//! - `exercise`: show a lesson (title, theory panel)
//! - `fullscreen`: toggle the preview display mode
//!
//! # Client → server
//!
//! - `edit`, `indent`, `refresh`, `fullscreen`, `load`, `report`

use serde::{Deserialize, Serialize};

use crate::buffer::BufferKind;
use crate::exercise::Exercise;

/// Message sent from the server to host pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewMessage {
    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
        /// Value for the preview iframe `sandbox` attribute
        sandbox: String,
        /// Text the host page inserts on Tab
        indent: String,
    },

    /// Full replacement of the preview document
    Render { document: String },

    /// Authoritative text of one buffer
    Buffer {
        kind: BufferKind,
        text: String,
        /// Caret position in UTF-16 code units
        #[serde(skip_serializing_if = "Option::is_none")]
        cursor: Option<usize>,
    },

    /// Current lesson
    Exercise { exercise: Box<Exercise> },

    Fullscreen { enabled: bool },
}

impl PreviewMessage {
    pub fn connected(sandbox: impl Into<String>, indent: impl Into<String>) -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
            sandbox: sandbox.into(),
            indent: indent.into(),
        }
    }

    pub fn render(document: &str) -> Self {
        Self::Render {
            document: document.to_string(),
        }
    }

    pub fn buffer(kind: BufferKind, text: impl Into<String>) -> Self {
        Self::Buffer {
            kind,
            text: text.into(),
            cursor: None,
        }
    }

    pub fn buffer_with_cursor(kind: BufferKind, text: impl Into<String>, cursor: usize) -> Self {
        Self::Buffer {
            kind,
            text: text.into(),
            cursor: Some(cursor),
        }
    }

    pub fn exercise(exercise: Exercise) -> Self {
        Self::Exercise {
            exercise: Box::new(exercise),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"type":"fullscreen","enabled":false}"#.to_string())
    }
}

/// Message sent from a host page to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Editor content changed (full text)
    Edit { kind: BufferKind, text: String },

    /// Tab pressed with the given selection (UTF-16 code units), applied to
    /// the server's text. The host page does not use it: keystrokes typed
    /// before the reply would be lost, so it inserts the `connected` indent
    /// unit locally and sends `edit`.
    Indent {
        kind: BufferKind,
        start: usize,
        end: usize,
    },

    /// Re-render the current document
    Refresh,

    Fullscreen { enabled: bool },

    /// Switch to another exercise
    Load { id: String },

    /// Error reported by the preview runtime
    Report { message: String },
}

impl ClientMessage {
    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message_json() {
        let json = PreviewMessage::render("<p>Hi</p>").to_json();
        assert_eq!(json, r#"{"type":"render","document":"<p>Hi</p>"}"#);
    }

    #[test]
    fn test_buffer_message_omits_missing_cursor() {
        let json = PreviewMessage::buffer(BufferKind::Style, "p{}").to_json();
        assert_eq!(json, r#"{"type":"buffer","kind":"style","text":"p{}"}"#);

        let json = PreviewMessage::buffer_with_cursor(BufferKind::Script, "  x", 2).to_json();
        assert!(json.contains(r#""cursor":2"#));
    }

    #[test]
    fn test_connected_carries_version() {
        let json = PreviewMessage::connected("allow-scripts", "  ").to_json();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
        assert!(json.contains(r#""sandbox":"allow-scripts""#));
        assert!(json.contains(r#""indent":"  ""#));
    }

    #[test]
    fn test_exercise_message_uses_camel_case() {
        let exercise = crate::exercise::Catalog::builtin()
            .get("demo")
            .cloned()
            .unwrap();
        let json = PreviewMessage::exercise(exercise).to_json();
        assert!(json.contains(r#""type":"exercise""#));
        assert!(json.contains(r#""starterCode""#));
    }

    #[test]
    fn test_parse_client_messages() {
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"edit","kind":"html","text":"<p>"}"#),
            Some(ClientMessage::Edit {
                kind: BufferKind::Markup,
                text: "<p>".into()
            })
        );
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"indent","kind":"script","start":3,"end":5}"#),
            Some(ClientMessage::Indent {
                kind: BufferKind::Script,
                start: 3,
                end: 5
            })
        );
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"refresh"}"#),
            Some(ClientMessage::Refresh)
        );
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"load","id":"demo"}"#),
            Some(ClientMessage::Load { id: "demo".into() })
        );
    }

    #[test]
    fn test_reject_unknown_client_message() {
        assert_eq!(ClientMessage::from_json(r#"{"type":"reload"}"#), None);
        assert_eq!(ClientMessage::from_json("not json"), None);
    }
}
