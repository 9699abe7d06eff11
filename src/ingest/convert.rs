//! Decode any rodio-supported input and re-encode it as canonical WAV.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, Source};

use crate::error::{Error, Result};

/// Canonical storage format: interleaved 32-bit float PCM at the source's
/// own channel count and sample rate.
pub(crate) fn canonical_spec(channels: u16, sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}

/// Decode `src` and write it to `dest` in the canonical format.
pub fn convert_to_wav(src: &Path, dest: &Path) -> Result<()> {
    let file = File::open(src)?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|err| Error::Decode(format!("{}: {err}", src.display())))?;

    let spec = canonical_spec(source.channels(), source.sample_rate());
    let mut writer = hound::WavWriter::create(dest, spec)?;
    for sample in source {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
