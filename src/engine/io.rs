//! Container codec for Deepfry
//!
//! Reads and writes WAV data through `hound`. The pipeline itself only ever
//! writes 16-bit integer WAV; reading accepts the common PCM and float
//! layouts.

use std::ffi::OsStr;
use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};

use crate::engine::buffer::AudioBuffer;
use crate::error::{DeepFryError, Result};

/// Input file formats the degrader accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    /// Uncompressed WAV container, loaded directly
    Wave,
    /// MPEG layer III, decoded through the lossy codec first
    Mpeg,
}

impl InputFormat {
    /// Classify a path by its extension, case-insensitively
    ///
    /// # Errors
    /// * `UnsupportedFormat` - for anything other than `.wav` or `.mp3`
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("wav") => Ok(InputFormat::Wave),
            Some("mp3") => Ok(InputFormat::Mpeg),
            other => Err(DeepFryError::UnsupportedFormat {
                extension: other.map(|ext| format!(".{}", ext)).unwrap_or_default(),
            }),
        }
    }
}

/// Decode WAV bytes into de-interleaved channels
///
/// # Errors
/// * `InvalidAudio` - if the bytes are not a readable WAV stream
/// * `UnsupportedFormat` - for integer bit depths other than 8/16/24/32
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| DeepFryError::InvalidAudio {
        reason: format!("Failed to open WAV data: {}", e),
        source: Some(Box::new(e)),
    })?;
    read_buffer(reader)
}

/// Encode a buffer as WAV bytes at the given bit depth
///
/// # Errors
/// * `UnsupportedFormat` - for bit depths other than 16, 24 or 32
pub fn encode_wav(buffer: &AudioBuffer, bit_depth: u16) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let writer = WavWriter::new(&mut cursor, wav_spec(buffer, bit_depth)?)
            .map_err(to_io_error)?;
        write_samples(writer, buffer, bit_depth)?;
    }
    Ok(cursor.into_inner())
}

/// Read a WAV file from disk
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * `InvalidAudio` - if the file is not a valid WAV file
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(DeepFryError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| DeepFryError::InvalidAudio {
        reason: format!("Failed to open WAV file {}: {}", path.display(), e),
        source: Some(Box::new(e)),
    })?;
    read_buffer(reader)
}

/// Write a buffer to a WAV file, replacing any existing content
pub fn write_wav(buffer: &AudioBuffer, path: &Path, bit_depth: u16) -> Result<()> {
    let writer = WavWriter::create(path, wav_spec(buffer, bit_depth)?).map_err(to_io_error)?;
    write_samples(writer, buffer, bit_depth)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn wav_spec(buffer: &AudioBuffer, bit_depth: u16) -> Result<WavSpec> {
    if !matches!(bit_depth, 16 | 24 | 32) {
        return Err(DeepFryError::UnsupportedFormat {
            extension: format!("{}-bit audio (only 16, 24, 32 supported)", bit_depth),
        });
    }

    let channels = u16::try_from(buffer.channels()).map_err(|_| DeepFryError::InvalidAudio {
        reason: format!("{} channels cannot be stored in WAV", buffer.channels()),
        source: None,
    })?;

    Ok(WavSpec {
        channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    })
}

fn read_buffer<R: std::io::Read>(reader: WavReader<R>) -> Result<AudioBuffer> {
    let spec = reader.spec();
    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    AudioBuffer::from_interleaved(&samples, spec.channels as usize, spec.sample_rate)
}

fn write_samples<W>(mut writer: WavWriter<W>, buffer: &AudioBuffer, bit_depth: u16) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let interleaved = buffer.to_interleaved();

    match bit_depth {
        16 => {
            for sample in interleaved {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled).map_err(to_io_error)?;
            }
        }
        24 => {
            for sample in interleaved {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled).map_err(to_io_error)?;
            }
        }
        _ => {
            for sample in interleaved {
                writer.write_sample(sample).map_err(to_io_error)?;
            }
        }
    }

    writer.finalize().map_err(to_io_error)
}

fn to_io_error(e: hound::Error) -> DeepFryError {
    match e {
        hound::Error::IoError(io) => DeepFryError::Io(io),
        other => DeepFryError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    fn invalid(depth: &str) -> impl Fn(hound::Error) -> DeepFryError + '_ {
        move |e| DeepFryError::InvalidAudio {
            reason: format!("Failed to read {} samples: {}", depth, e),
            source: Some(Box::new(e)),
        }
    }

    match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid("float")),
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid("8-bit")),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid("16-bit")),
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid("24-bit")),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2147483648.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid("32-bit int")),
        (SampleFormat::Int, bits) => Err(DeepFryError::UnsupportedFormat {
            extension: format!("{}-bit integer audio", bits),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
