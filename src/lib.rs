//! rondo: music library and playback core.
//!
//! Two subsystems do the actual work:
//!
//! - **Ingestion** ([`ingest`]): imports arbitrary audio files or whole
//!   directory trees, converts each one to a canonical WAV under
//!   `<audio_root>/<name>/<name>.wav` and registers the name in the
//!   persisted [`catalog`]. Duplicate names are skipped, broken files are
//!   reported per-file and never abort a batch.
//! - **Playback** ([`playback`]): one session at a time streams canonical
//!   WAV frames to an output device on a dedicated thread, with
//!   play/pause/resume/stop control and a frame cursor that survives
//!   pause/resume.
//!
//! [`Player`] composes both plus the [`events::Notifier`] into the surface a
//! front-end consumes. There is no global state: every component receives
//! its collaborators explicitly.

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod ingest;
pub mod playback;
pub mod player;
pub mod track;

pub use config::Settings;
pub use error::{Error, Result};
pub use events::{Event, Notifier};
pub use ingest::{ImportResult, Importer, SkipReason};
pub use playback::{PlaybackEngine, PlaybackState};
pub use player::Player;
pub use track::Track;
