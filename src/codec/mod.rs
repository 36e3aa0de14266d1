//! Lossy codec boundary
//!
//! The degrader never compresses audio itself: it hands the working buffer to
//! a [`LossyCodec`] and processes whatever samples come back. The production
//! codec drives the external LAME encoder; [`mock`] provides in-memory
//! stand-ins for tests.

mod lame;
pub mod mock;

pub use lame::{LameCodec, DEFAULT_LAME_BINARY};

use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::pipeline::TempArtifacts;

/// Encode/decode boundary consumed by the degrader
///
/// Implementations may use the run's scratch files in `scratch`; anything
/// they write there is removed by the degrader when the run ends.
pub trait LossyCodec {
    /// Compress `buffer` at `bitrate` kbps
    fn encode(
        &mut self,
        buffer: &AudioBuffer,
        bitrate: u32,
        scratch: &TempArtifacts,
    ) -> Result<Vec<u8>>;

    /// Decompress `data` back into samples and their sample rate
    fn decode(&mut self, data: &[u8], scratch: &TempArtifacts) -> Result<AudioBuffer>;

    /// Short name used in log output
    fn name(&self) -> &str;
}

impl<C: LossyCodec + ?Sized> LossyCodec for Box<C> {
    fn encode(
        &mut self,
        buffer: &AudioBuffer,
        bitrate: u32,
        scratch: &TempArtifacts,
    ) -> Result<Vec<u8>> {
        (**self).encode(buffer, bitrate, scratch)
    }

    fn decode(&mut self, data: &[u8], scratch: &TempArtifacts) -> Result<AudioBuffer> {
        (**self).decode(data, scratch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
