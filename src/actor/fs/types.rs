use std::path::PathBuf;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Debounced file events, sorted by path
pub(super) struct DebouncedEvents(pub(super) Vec<(PathBuf, ChangeKind)>);

impl DebouncedEvents {
    pub(super) fn paths(&self) -> Vec<PathBuf> {
        self.0.iter().map(|(path, _)| path.clone()).collect()
    }

    /// One line per change, for the watch log.
    pub(super) fn describe(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(path, kind)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("{} {}", kind.label(), name)
            })
            .collect()
    }
}
