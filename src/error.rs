//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The canonical WAV for a catalog name is missing. This can happen
    /// legitimately: delete-all may race a front-end that just listed the
    /// catalog.
    #[error("track not found: {0}")]
    TrackNotFound(String),

    /// The output device could not be opened or written.
    #[error("audio device error: {0}")]
    Device(String),

    /// A source file could not be decoded, or a canonical WAV is malformed.
    #[error("decode error: {0}")]
    Decode(String),

    /// The operation is not valid in the current playback state.
    #[error("invalid state: {0}")]
    State(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Error::Io(io),
            other => Error::Decode(other.to_string()),
        }
    }
}
