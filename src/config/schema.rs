use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/rondo/config.toml` or
/// `~/.config/rondo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RONDO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library: LibrarySettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root directory holding one `<name>/<name>.wav` folder per track.
    pub audio_root: PathBuf,
    /// Catalog file listing known track names, one per line. Lives inside
    /// the audio root so delete-all removes it together with the tracks
    /// (it has already been truncated by then).
    pub catalog_file: PathBuf,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            audio_root: PathBuf::from("Audio"),
            catalog_file: PathBuf::from("Audio/song_list.txt"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Frames per chunk the streaming loop reads and writes. Also bounds
    /// how long a pause request can go unnoticed.
    pub chunk_frames: usize,
    /// Maximum chunks queued on the output device before the loop blocks.
    /// Together with `chunk_frames` this bounds pause latency.
    pub queue_depth: usize,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            chunk_frames: 1024,
            queue_depth: 4,
        }
    }
}
