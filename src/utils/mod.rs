//! Small shared helpers.
//!
//! - [`html`]: entity escaping for text injected into documents
//! - [`mime`]: `Content-Type` for workspace files
//! - [`path`]: filesystem path normalization

pub mod html;
pub mod mime;
pub mod path;
