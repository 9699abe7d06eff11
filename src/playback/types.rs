use std::sync::{Condvar, Mutex};

use crate::track::Track;

/// Engine phase. The streaming loop owns an open device handle exactly
/// while the session is `Playing` or `Paused` (paused keeps the device so
/// resuming never pays the re-acquisition latency).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded.
    Idle,
    /// A track is selected and the cursor set; no streaming loop runs.
    Loaded,
    /// The streaming loop is writing frames to the device.
    Playing,
    /// The loop is alive but parked before its next write; cursor frozen.
    Paused,
}

/// Format of the canonical WAV being streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSpec {
    pub channels: u16,
    pub sample_rate: u32,
}

/// Session state shared between the engine facade and the streaming loop.
/// The condvar wakes a paused loop; it is owned by the engine instance, not
/// reachable from anywhere else.
pub(super) struct Shared {
    pub(super) session: Mutex<Session>,
    pub(super) resume: Condvar,
}

impl Shared {
    pub(super) fn new() -> Self {
        Self {
            session: Mutex::new(Session::new()),
            resume: Condvar::new(),
        }
    }
}

pub(super) struct Session {
    pub(super) track: Option<Track>,
    /// Frame index within the canonical WAV. Monotonically non-decreasing
    /// while playing, frozen across pause/resume, reset only by load/stop.
    pub(super) cursor: u64,
    pub(super) state: PlaybackState,
    pub(super) pause_requested: bool,
    pub(super) stop_requested: bool,
    /// True from the moment `play()` commits to spawning a loop until that
    /// loop's exit path runs. Tracked separately from `state` so a double
    /// `play()` can never spawn a second loop even if the two desynchronize
    /// for an instant.
    pub(super) loop_alive: bool,
}

impl Session {
    pub(super) fn new() -> Self {
        Self {
            track: None,
            cursor: 0,
            state: PlaybackState::Idle,
            pause_requested: false,
            stop_requested: false,
            loop_alive: false,
        }
    }
}
