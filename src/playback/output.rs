//! Output-device seam and the rodio-backed production implementation.

use std::thread;
use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::types::StreamSpec;
use crate::error::{Error, Result};

/// Sink for interleaved f32 frames. An implementation lives on the
/// streaming thread for the lifetime of one session; dropping it releases
/// the device.
pub trait AudioOutput {
    /// Write one chunk of interleaved frames; may block for backpressure.
    fn write(&mut self, frames: &[f32]) -> Result<()>;

    /// Block until everything already written has been played out. Called
    /// when the source is exhausted, not on stop.
    fn drain(&mut self);
}

/// Opens an [`AudioOutput`] for a stream format. Invoked on the streaming
/// thread itself: the rodio output stream is not `Send`, so the device must
/// be acquired on the thread that uses it.
pub trait OutputFactory: Send + Sync {
    fn open(&self, spec: StreamSpec) -> Result<Box<dyn AudioOutput>>;
}

/// Production factory: default host device via rodio.
pub struct RodioOutputFactory {
    /// Max chunks queued on the sink before `write` blocks.
    pub queue_depth: usize,
}

impl OutputFactory for RodioOutputFactory {
    fn open(&self, spec: StreamSpec) -> Result<Box<dyn AudioOutput>> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| Error::Device(err.to_string()))?;
        // rodio logs to stderr when the stream drops; noise for a library.
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());
        Ok(Box::new(RodioOutput {
            _stream: stream,
            sink,
            spec,
            queue_depth: self.queue_depth.max(1),
        }))
    }
}

/// One rodio `Sink` fed with `SamplesBuffer` chunks. The bounded queue
/// keeps pause latency at roughly `queue_depth` chunks instead of letting
/// the loop shovel the whole file into the mixer.
struct RodioOutput {
    _stream: OutputStream,
    sink: Sink,
    spec: StreamSpec,
    queue_depth: usize,
}

impl AudioOutput for RodioOutput {
    fn write(&mut self, frames: &[f32]) -> Result<()> {
        while self.sink.len() >= self.queue_depth {
            thread::sleep(Duration::from_millis(1));
        }
        self.sink.append(SamplesBuffer::new(
            self.spec.channels,
            self.spec.sample_rate,
            frames.to_vec(),
        ));
        Ok(())
    }

    fn drain(&mut self) {
        self.sink.sleep_until_end();
    }
}
