//! Track identity and the canonical on-disk layout.

use std::path::{Path, PathBuf};

/// A known track. Identity is the name: the source filename without its
/// extension, which doubles as the per-track storage directory name. The
/// directory name and the catalog entry must always match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// `<audio_root>/<name>/<name>.wav`: the only path the playback engine
    /// ever reads and the only place ingestion ever writes a track.
    pub fn canonical_path(audio_root: &Path, name: &str) -> PathBuf {
        audio_root.join(name).join(format!("{name}.wav"))
    }

    pub fn path_under(&self, audio_root: &Path) -> PathBuf {
        Self::canonical_path(audio_root, &self.name)
    }
}
