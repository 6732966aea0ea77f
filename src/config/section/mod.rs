//! Configuration section definitions.
//!
//! Each module corresponds to a section in `techlearn.toml`:
//!
//! | Module      | TOML Section    | Purpose                             |
//! |-------------|-----------------|-------------------------------------|
//! | `serve`     | `[serve]`       | Development server                  |
//! | `preview`   | `[preview]`     | Document skeleton, render timing    |
//! | `editor`    | `[editor]`      | Editing affordances                 |
//! | `exercises` | `[exercises]`   | Exercise directory, default lesson  |

mod editor;
mod exercises;
mod preview;
mod serve;

pub use editor::EditorConfig;
pub use exercises::ExercisesConfig;
pub use preview::PreviewConfig;
pub use serve::ServeConfig;
