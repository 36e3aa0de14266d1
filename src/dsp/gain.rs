//! Gain Stage
//!
//! Boosts every sample by a fixed dB amount and shapes the result through a
//! clip function: `x -> clip(x * 10^(gain_db / 20))`.

use crate::dsp::clip::ClipFunction;
use crate::engine::{db_to_linear, AudioBuffer};

/// Gain boost followed by clipping
///
/// The linear amplitude is computed once at construction.
///
/// # Example
/// ```
/// use deepfry::dsp::{ClipFunction, GainStage};
/// use deepfry::engine::AudioBuffer;
///
/// let stage = GainStage::new(6.0, ClipFunction::Hard(1.0));
/// let mut buffer = AudioBuffer::mono(vec![0.9, -0.1], 8000);
/// stage.process(&mut buffer);
/// assert_eq!(buffer.channel(0)[0], 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainStage {
    gain_db: f32,
    amplitude: f32,
    clip: ClipFunction,
}

impl GainStage {
    /// Create a gain stage for `gain_db` decibels and the given clip function
    pub fn new(gain_db: f32, clip: ClipFunction) -> Self {
        Self {
            gain_db,
            amplitude: db_to_linear(gain_db),
            clip,
        }
    }

    /// Gain in decibels
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Linear amplitude multiplier
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Clip function applied after the boost
    pub fn clip(&self) -> ClipFunction {
        self.clip
    }

    /// Boost and clip a single sample
    #[inline]
    pub fn process_sample(&self, sample: f32) -> f32 {
        self.clip.apply(sample * self.amplitude)
    }

    /// Boost and clip every sample of every channel in place
    pub fn process(&self, buffer: &mut AudioBuffer) {
        for sample in buffer.iter_samples_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
