//! Mock codec for testing
//!
//! Does no compression at all: "compressed" bytes are 16-bit WAV, so a
//! round trip only quantises. It writes to the scratch files like the real
//! codec does and records every bitrate it was asked for, which lets tests
//! check the loop and the cleanup without an external encoder.

use std::fs;

use crate::codec::LossyCodec;
use crate::engine::{decode_wav, encode_wav, AudioBuffer, OUTPUT_BIT_DEPTH};
use crate::error::{DeepFryError, Result};
use crate::pipeline::TempArtifacts;

/// In-memory stand-in for a lossy codec
#[derive(Debug, Clone, Default)]
pub struct MockCodec {
    bitrates: Vec<u32>,
    decodes: usize,
    fail_on_encode: Option<usize>,
    fail_on_decode: Option<usize>,
}

impl MockCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`-th encode call (1-based)
    pub fn fail_on_encode(mut self, n: usize) -> Self {
        self.fail_on_encode = Some(n);
        self
    }

    /// Fail the `n`-th decode call (1-based)
    pub fn fail_on_decode(mut self, n: usize) -> Self {
        self.fail_on_decode = Some(n);
        self
    }

    /// Bitrates of every encode call, in order
    pub fn bitrates(&self) -> &[u32] {
        &self.bitrates
    }

    pub fn encode_calls(&self) -> usize {
        self.bitrates.len()
    }

    pub fn decode_calls(&self) -> usize {
        self.decodes
    }
}

impl LossyCodec for MockCodec {
    fn encode(
        &mut self,
        buffer: &AudioBuffer,
        bitrate: u32,
        scratch: &TempArtifacts,
    ) -> Result<Vec<u8>> {
        self.bitrates.push(bitrate);
        if self.fail_on_encode == Some(self.bitrates.len()) {
            return Err(DeepFryError::codec("encode", "mock encode failure"));
        }

        let bytes = encode_wav(buffer, OUTPUT_BIT_DEPTH)?;
        fs::write(scratch.raw(), &bytes)?;
        fs::write(scratch.compressed(), &bytes)?;
        Ok(bytes)
    }

    fn decode(&mut self, data: &[u8], scratch: &TempArtifacts) -> Result<AudioBuffer> {
        self.decodes += 1;
        if self.fail_on_decode == Some(self.decodes) {
            return Err(DeepFryError::codec("decode", "mock decode failure"));
        }

        fs::write(scratch.raw(), data)?;
        decode_wav(data)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
