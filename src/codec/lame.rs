//! LAME encoder bridge
//!
//! Runs the `lame` command-line encoder as a child process. Audio travels
//! through the run's scratch files: the buffer is written as 16-bit WAV to
//! the raw artifact, encoded into the compressed artifact, and decoded back
//! the same way.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::codec::LossyCodec;
use crate::engine::{read_wav, write_wav, AudioBuffer, OUTPUT_BIT_DEPTH};
use crate::error::{DeepFryError, Result};
use crate::pipeline::TempArtifacts;

/// Default encoder binary, resolved through `PATH`
pub const DEFAULT_LAME_BINARY: &str = "lame";

/// Lossy codec backed by the external LAME encoder
#[derive(Debug, Clone)]
pub struct LameCodec {
    binary: PathBuf,
}

impl LameCodec {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_LAME_BINARY)
    }

    /// Use a specific encoder binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, stage: &'static str, args: &[&OsStr]) -> Result<Output> {
        debug!("{} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| DeepFryError::CodecUnavailable {
                program: self.binary.display().to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeepFryError::codec(
                stage,
                format!("{} ({})", output.status, stderr.trim()),
            ));
        }

        Ok(output)
    }
}

impl Default for LameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LossyCodec for LameCodec {
    fn encode(
        &mut self,
        buffer: &AudioBuffer,
        bitrate: u32,
        scratch: &TempArtifacts,
    ) -> Result<Vec<u8>> {
        write_wav(buffer, scratch.raw(), OUTPUT_BIT_DEPTH)?;

        let bitrate = bitrate.to_string();
        self.run(
            "encode",
            &[
                OsStr::new("--quiet"),
                OsStr::new("--cbr"),
                OsStr::new("-b"),
                OsStr::new(&bitrate),
                scratch.raw().as_os_str(),
                scratch.compressed().as_os_str(),
            ],
        )?;

        Ok(fs::read(scratch.compressed())?)
    }

    fn decode(&mut self, data: &[u8], scratch: &TempArtifacts) -> Result<AudioBuffer> {
        fs::write(scratch.compressed(), data)?;

        self.run(
            "decode",
            &[
                OsStr::new("--quiet"),
                OsStr::new("--decode"),
                scratch.compressed().as_os_str(),
                scratch.raw().as_os_str(),
            ],
        )?;

        read_wav(scratch.raw()).map_err(|e| match e {
            DeepFryError::FileNotFound { .. } => {
                DeepFryError::codec("decode", "encoder produced no output")
            }
            other => other,
        })
    }

    fn name(&self) -> &str {
        "lame"
    }
}
