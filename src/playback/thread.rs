//! The streaming loop: one dedicated thread per playback session.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use hound::SampleFormat;
use log::{error, info};

use super::output::OutputFactory;
use super::types::{PlaybackState, Shared, StreamSpec};
use crate::error::Error;
use crate::events::{Event, Notifier};

pub(super) struct StreamParams {
    pub(super) path: PathBuf,
    pub(super) chunk_frames: usize,
    pub(super) shared: Arc<Shared>,
    pub(super) factory: Arc<dyn OutputFactory>,
    pub(super) notifier: Arc<Notifier>,
}

pub(super) fn spawn_stream_thread(params: StreamParams) -> JoinHandle<()> {
    thread::spawn(move || stream_loop(params))
}

enum Exit {
    /// Source exhausted; let queued audio play out.
    Finished,
    /// Explicit stop; drop the device immediately.
    Stopped,
    Failed(Error),
}

fn stream_loop(params: StreamParams) {
    let StreamParams {
        path,
        chunk_frames,
        shared,
        factory,
        notifier,
    } = params;

    // Open the source and the device before touching the state machine, so
    // a failure here leaves the session Loaded (never Playing) and the
    // caller is free to retry.
    let mut reader = match hound::WavReader::open(&path) {
        Ok(reader) => reader,
        Err(err) => {
            fail_before_start(&shared, &notifier, Error::from(err));
            return;
        }
    };
    let wav_spec = reader.spec();
    if wav_spec.sample_format != SampleFormat::Float || wav_spec.bits_per_sample != 32 {
        fail_before_start(
            &shared,
            &notifier,
            Error::Decode(format!(
                "{} is not a canonical 32-bit float WAV",
                path.display()
            )),
        );
        return;
    }
    let spec = StreamSpec {
        channels: wav_spec.channels,
        sample_rate: wav_spec.sample_rate,
    };

    let mut output = match factory.open(spec) {
        Ok(output) => output,
        Err(err) => {
            fail_before_start(&shared, &notifier, err);
            return;
        }
    };

    // A fresh load always starts at 0; the seek keeps the loop honest about
    // reading from the session cursor wherever it points.
    let start = { shared.session.lock().unwrap().cursor };
    let Ok(start) = u32::try_from(start) else {
        fail_before_start(
            &shared,
            &notifier,
            Error::Decode(format!("cursor {start} exceeds the WAV frame range")),
        );
        return;
    };
    if let Err(err) = reader.seek(start) {
        fail_before_start(&shared, &notifier, Error::Io(err));
        return;
    }

    transition(&shared, &notifier, PlaybackState::Playing);
    info!(
        "streaming {} ({} ch @ {} Hz, {} frames/chunk)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        chunk_frames
    );

    let channels = spec.channels as usize;
    let chunk_len = chunk_frames * channels;
    let mut samples = reader.samples::<f32>();

    let exit = loop {
        // Honor stop and pause between chunks, never mid-chunk. A paused
        // loop parks here with the device handle still open.
        {
            let mut session = shared.session.lock().unwrap();
            if session.stop_requested {
                break Exit::Stopped;
            }
            while session.pause_requested && !session.stop_requested {
                session = shared.resume.wait(session).unwrap();
            }
            if session.stop_requested {
                break Exit::Stopped;
            }
        }

        let mut chunk = Vec::with_capacity(chunk_len);
        let mut read_err = None;
        for sample in samples.by_ref().take(chunk_len) {
            match sample {
                Ok(s) => chunk.push(s),
                Err(err) => {
                    read_err = Some(err);
                    break;
                }
            }
        }
        if let Some(err) = read_err {
            // Any read failure mid-track means the canonical file is bad,
            // whatever the underlying cause.
            break Exit::Failed(Error::Decode(format!("{}: {err}", path.display())));
        }
        if chunk.is_empty() {
            break Exit::Finished;
        }

        if let Err(err) = output.write(&chunk) {
            break Exit::Failed(err);
        }

        let frames = (chunk.len() / channels) as u64;
        shared.session.lock().unwrap().cursor += frames;
    };

    match exit {
        Exit::Finished => output.drain(),
        Exit::Stopped => {}
        Exit::Failed(ref err) => {
            error!("streaming {} failed: {err}", path.display());
            notifier.emit(Event::PlaybackError {
                message: err.to_string(),
            });
        }
    }
    drop(output);

    // Every exit path ends the session: device closed, cursor reset, loop
    // liveness cleared.
    let old = {
        let mut session = shared.session.lock().unwrap();
        session.loop_alive = false;
        session.stop_requested = false;
        session.pause_requested = false;
        session.track = None;
        session.cursor = 0;
        let old = session.state;
        session.state = PlaybackState::Idle;
        old
    };
    if old != PlaybackState::Idle {
        notifier.emit(Event::PlaybackStateChanged {
            old,
            new: PlaybackState::Idle,
        });
    }
}

/// Failure before the session ever reached Playing: report it, clear loop
/// liveness and leave the session Loaded so the caller may retry.
fn fail_before_start(shared: &Shared, notifier: &Notifier, err: Error) {
    error!("playback start failed: {err}");
    {
        let mut session = shared.session.lock().unwrap();
        session.loop_alive = false;
        session.stop_requested = false;
        session.pause_requested = false;
    }
    notifier.emit(Event::PlaybackError {
        message: err.to_string(),
    });
}

fn transition(shared: &Shared, notifier: &Notifier, new: PlaybackState) {
    let old = {
        let mut session = shared.session.lock().unwrap();
        let old = session.state;
        session.state = new;
        old
    };
    if old != new {
        notifier.emit(Event::PlaybackStateChanged { old, new });
    }
}
