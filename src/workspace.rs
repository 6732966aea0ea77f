//! On-disk workspace: one file per buffer.
//!
//! ```text
//! <root>/
//! ├── index.html   ← Markup
//! ├── style.css    ← Style
//! └── script.js    ← Script
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::buffer::{BufferKind, Snapshot};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("`{0}` already exists (use --force to overwrite)")]
    Exists(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `kind`.
    pub fn path(&self, kind: BufferKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Whether `path` is one of the three buffer files.
    pub fn owns(&self, path: &Path) -> Option<BufferKind> {
        let kind = BufferKind::from_path(path)?;
        (path.parent()? == self.root.as_path()).then_some(kind)
    }

    /// Read one buffer file. A missing file reads as empty.
    pub fn read(&self, kind: BufferKind) -> Result<String, WorkspaceError> {
        let path = self.path(kind);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(WorkspaceError::Io(path, e)),
        }
    }

    pub fn read_snapshot(&self) -> Result<Snapshot, WorkspaceError> {
        Ok(Snapshot::new(
            self.read(BufferKind::Markup)?,
            self.read(BufferKind::Style)?,
            self.read(BufferKind::Script)?,
        ))
    }

    /// Write all three files.
    ///
    /// Without `force`, nothing is written when any of them already exists.
    pub fn write_snapshot(&self, snapshot: &Snapshot, force: bool) -> Result<(), WorkspaceError> {
        if !force
            && let Some(existing) = BufferKind::ALL
                .into_iter()
                .map(|kind| self.path(kind))
                .find(|path| path.exists())
        {
            return Err(WorkspaceError::Exists(existing));
        }

        fs::create_dir_all(&self.root).map_err(|e| WorkspaceError::Io(self.root.clone(), e))?;
        for kind in BufferKind::ALL {
            let path = self.path(kind);
            fs::write(&path, snapshot.get(kind)).map_err(|e| WorkspaceError::Io(path, e))?;
        }
        Ok(())
    }

    /// Whether at least one buffer file exists.
    pub fn is_initialized(&self) -> bool {
        BufferKind::ALL
            .into_iter()
            .any(|kind| self.path(kind).is_file())
    }
}
