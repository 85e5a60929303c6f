use std::path::PathBuf;

use super::reference::MediaReference;

/// Maps references to files in the destination directory.
///
/// Both the [`ResumeGate`] and the downloader derive paths through this type,
/// so "already archived" and "where to write" always agree.
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    directory: PathBuf,
}

impl DestinationLayout {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, reference: &MediaReference) -> PathBuf {
        self.directory.join(reference.file_name())
    }
}

/// Decides where an incremental walk ends: at the first reference whose
/// file is already present locally.
#[derive(Debug, Clone)]
pub struct ResumeGate {
    layout: DestinationLayout,
}

impl ResumeGate {
    pub fn new(layout: DestinationLayout) -> Self {
        Self { layout }
    }

    pub fn should_stop(&self, reference: &MediaReference) -> bool {
        self.layout.path_for(reference).exists()
    }
}
