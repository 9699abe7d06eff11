//! Playback engine: one session streaming canonical WAV frames to an
//! output device.
//!
//! The state machine is Idle -> Loaded -> Playing <-> Paused, back to Idle
//! on stop, exhaustion or a mid-stream failure. `play`, `pause`, `resume`
//! and `toggle` only flip state and signals and return immediately; all
//! file and device I/O lives on the streaming thread. Pause is cooperative:
//! the loop parks on a condvar before its next chunk and keeps the device
//! handle open so resume never re-acquires the device.

mod output;
mod thread;
mod types;


pub use output::{AudioOutput, OutputFactory, RodioOutputFactory};
pub use types::{PlaybackState, StreamSpec};

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::info;

use crate::config::AudioSettings;
use crate::error::{Error, Result};
use crate::events::{Event, Notifier};
use crate::track::Track;

use thread::{StreamParams, spawn_stream_thread};
use types::Shared;

pub struct PlaybackEngine {
    audio_root: PathBuf,
    settings: AudioSettings,
    factory: Arc<dyn OutputFactory>,
    notifier: Arc<Notifier>,
    shared: Arc<Shared>,
    join: Mutex<Option<JoinHandle<()>>>,
}

enum PlayAction {
    Resume,
    Spawn(PathBuf),
}

impl PlaybackEngine {
    pub fn new(
        audio_root: impl Into<PathBuf>,
        settings: AudioSettings,
        factory: Arc<dyn OutputFactory>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            audio_root: audio_root.into(),
            settings,
            factory,
            notifier,
            shared: Arc::new(Shared::new()),
            join: Mutex::new(None),
        }
    }

    /// Select `name` for playback and reset the cursor to 0.
    ///
    /// Allowed from Idle, Loaded and Paused (a paused loop is shut down
    /// first); rejected while Playing. Fails with [`Error::TrackNotFound`]
    /// when the canonical file is absent; the file can disappear between a
    /// catalog lookup and the load, so this is checked, not assumed.
    pub fn load(&self, name: &str) -> Result<()> {
        {
            let session = self.shared.session.lock().unwrap();
            if session.state == PlaybackState::Playing {
                return Err(Error::State("cannot load while playing; stop first"));
            }
        }
        self.shutdown_loop();

        let path = Track::canonical_path(&self.audio_root, name);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(Error::TrackNotFound(name.to_string())),
        }

        let old = {
            let mut session = self.shared.session.lock().unwrap();
            let old = session.state;
            session.track = Some(Track::new(name));
            session.cursor = 0;
            session.state = PlaybackState::Loaded;
            old
        };
        info!("loaded track {name}");
        if old != PlaybackState::Loaded {
            self.notifier.emit(Event::PlaybackStateChanged {
                old,
                new: PlaybackState::Loaded,
            });
        }
        Ok(())
    }

    /// Start streaming, or resume a paused session from the retained
    /// cursor. Returns immediately; the device is opened on the streaming
    /// thread. Calling `play` while a loop is already alive is a no-op.
    pub fn play(&self) -> Result<()> {
        let action = {
            let mut session = self.shared.session.lock().unwrap();
            match session.state {
                PlaybackState::Idle => return Err(Error::State("nothing loaded")),
                PlaybackState::Playing => return Ok(()),
                PlaybackState::Paused => {
                    session.pause_requested = false;
                    session.state = PlaybackState::Playing;
                    self.shared.resume.notify_all();
                    PlayAction::Resume
                }
                PlaybackState::Loaded => {
                    if session.loop_alive {
                        // A loop is still starting up or winding down.
                        return Ok(());
                    }
                    let Some(track) = session.track.as_ref() else {
                        return Err(Error::State("nothing loaded"));
                    };
                    let path = track.path_under(&self.audio_root);
                    session.loop_alive = true;
                    session.stop_requested = false;
                    session.pause_requested = false;
                    PlayAction::Spawn(path)
                }
            }
        };

        match action {
            PlayAction::Resume => {
                self.notifier.emit(Event::PlaybackStateChanged {
                    old: PlaybackState::Paused,
                    new: PlaybackState::Playing,
                });
                Ok(())
            }
            PlayAction::Spawn(path) => {
                let handle = spawn_stream_thread(StreamParams {
                    path,
                    chunk_frames: self.settings.chunk_frames.max(1),
                    shared: self.shared.clone(),
                    factory: self.factory.clone(),
                    notifier: self.notifier.clone(),
                });
                *self.join.lock().unwrap() = Some(handle);
                Ok(())
            }
        }
    }

    /// Ask the loop to park before its next chunk write. Returns without
    /// waiting for the loop to actually reach the parked point; the loop
    /// may take up to one chunk to honor the request. The device handle
    /// stays open.
    pub fn pause(&self) -> Result<()> {
        {
            let mut session = self.shared.session.lock().unwrap();
            if session.state != PlaybackState::Playing {
                return Err(Error::State("not playing"));
            }
            session.pause_requested = true;
            session.state = PlaybackState::Paused;
        }
        self.notifier.emit(Event::PlaybackStateChanged {
            old: PlaybackState::Playing,
            new: PlaybackState::Paused,
        });
        Ok(())
    }

    /// Continue a paused session; identical to [`PlaybackEngine::play`]
    /// from Paused. Streaming continues from the retained cursor.
    pub fn resume(&self) -> Result<()> {
        if self.state() != PlaybackState::Paused {
            return Err(Error::State("not paused"));
        }
        self.play()
    }

    /// The single control a play/pause button needs.
    pub fn toggle(&self) -> Result<()> {
        match self.state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Loaded | PlaybackState::Paused => self.play(),
            PlaybackState::Idle => Err(Error::State("nothing loaded")),
        }
    }

    /// Stop streaming and clear the session. Joins the streaming thread
    /// before returning, so the device is released only after its in-flight
    /// write has completed. A no-op when already Idle.
    pub fn stop(&self) -> Result<()> {
        self.shutdown_loop();

        // No loop was running (Loaded): clear the session inline.
        let old = {
            let mut session = self.shared.session.lock().unwrap();
            if session.state == PlaybackState::Idle {
                return Ok(());
            }
            let old = session.state;
            session.track = None;
            session.cursor = 0;
            session.state = PlaybackState::Idle;
            old
        };
        self.notifier.emit(Event::PlaybackStateChanged {
            old,
            new: PlaybackState::Idle,
        });
        Ok(())
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.session.lock().unwrap().state
    }

    /// Frame cursor within the loaded track; 0 when nothing is loaded.
    pub fn cursor(&self) -> u64 {
        self.shared.session.lock().unwrap().cursor
    }

    /// Name of the loaded track, if any.
    pub fn current(&self) -> Option<String> {
        self.shared
            .session
            .lock()
            .unwrap()
            .track
            .as_ref()
            .map(|t| t.name.clone())
    }

    /// Signal a live loop to stop and join it. Leaves session cleanup to
    /// the loop's own exit path.
    fn shutdown_loop(&self) {
        let should_join = {
            let mut session = self.shared.session.lock().unwrap();
            if session.loop_alive {
                session.stop_requested = true;
                self.shared.resume.notify_all();
                true
            } else {
                false
            }
        };
        if should_join {
            let handle = self.join.lock().unwrap().take();
            if let Some(handle) = handle {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.shutdown_loop();
    }
}
