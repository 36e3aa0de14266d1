//! Noise Trimmer
//!
//! Cuts noisy lead-in and tail regions from a single channel. Activity is
//! measured with an envelope follower: the ratio of summed absolute
//! sample-to-sample differences to summed absolute sample values over a
//! short trailing window. That ratio is smoothed and classified with two
//! thresholds (hysteresis) to avoid chattering between noisy and quiet.

use serde::{Deserialize, Serialize};

use crate::engine::AudioBuffer;
use crate::error::{DeepFryError, Result};

/// Rolling sums smaller than this are treated as exactly zero
///
/// Adding and subtracting the same values leaves rounding residue behind,
/// which would otherwise turn silence into an arbitrary ratio.
const ZERO_SUM_EPSILON: f64 = 1e-9;

/// Trimmer parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Trailing window for the absolute-value and difference sums (minus one)
    pub integrator_window: usize,
    /// Memory depth of the ratio smoother
    pub average_window: usize,
    /// Smoothed ratio below which noise turns into signal
    pub low_threshold: f64,
    /// Smoothed ratio above which signal turns back into noise
    pub high_threshold: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            integrator_window: 16,
            average_window: 256,
            low_threshold: 0.4,
            high_threshold: 0.7,
        }
    }
}

impl TrimConfig {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        if self.integrator_window == 0 {
            return Err(DeepFryError::config("integrator_window must be at least 1"));
        }
        if self.average_window == 0 {
            return Err(DeepFryError::config("average_window must be at least 1"));
        }
        if !self.low_threshold.is_finite() || self.low_threshold < 0.0 {
            return Err(DeepFryError::config(format!(
                "low_threshold must be a non-negative number, got {}",
                self.low_threshold
            )));
        }
        if !self.high_threshold.is_finite() || self.high_threshold < self.low_threshold {
            return Err(DeepFryError::config(format!(
                "high_threshold ({}) must be at least low_threshold ({})",
                self.high_threshold, self.low_threshold
            )));
        }
        Ok(())
    }
}

/// Half-open sample range `[start, end)` kept by the trimmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRegion {
    pub start: usize,
    pub end: usize,
}

impl TrimRegion {
    /// Number of samples kept
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Envelope-ratio noise trimmer
#[derive(Debug, Clone, Default)]
pub struct NoiseTrimmer {
    config: TrimConfig,
}

impl NoiseTrimmer {
    pub fn new(config: TrimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrimConfig {
        &self.config
    }

    /// Locate the region to keep, or `None` if nothing should be trimmed
    ///
    /// Buffers shorter than `integrator_window + 1` samples never produce
    /// a region.
    pub fn find_region(&self, samples: &[f32]) -> Option<TrimRegion> {
        let TrimConfig {
            integrator_window,
            average_window,
            low_threshold,
            high_threshold,
        } = self.config;

        let magnitude = |i: usize| samples[i].abs() as f64;
        let difference = |i: usize| {
            if i == 0 {
                0.0
            } else {
                (samples[i] - samples[i - 1]).abs() as f64
            }
        };

        let mut sum0 = 0.0_f64;
        let mut sum1 = 0.0_f64;
        let mut avg: Option<f64> = None;
        let mut is_noise = true;
        let mut trim_start: Option<usize> = None;
        let mut trim_end: Option<usize> = None;

        for i in 0..samples.len() {
            sum0 += magnitude(i);
            sum1 += difference(i);
            if i > integrator_window {
                let oldest = i - integrator_window - 1;
                sum0 -= magnitude(oldest);
                sum1 -= difference(oldest);
            }

            // Warm-up: the window is not full yet
            if i < integrator_window {
                continue;
            }

            let ratio = if sum0 <= ZERO_SUM_EPSILON {
                0.0
            } else {
                sum1.max(0.0) / sum0
            };

            let smoothed = match avg {
                None => ratio,
                Some(prev) => {
                    let w = average_window as f64;
                    (prev * (w - 1.0) + ratio) / w
                }
            };
            avg = Some(smoothed);

            if is_noise && smoothed < low_threshold {
                is_noise = false;
                let candidate = i.saturating_sub(average_window);
                trim_start = Some(trim_start.map_or(candidate, |s| s.min(candidate)));
            } else if !is_noise && smoothed > high_threshold {
                is_noise = true;
                // A negative candidate can never follow a start, so drop it
                if let Some(candidate) = i.checked_sub(average_window) {
                    trim_end = Some(trim_end.map_or(candidate, |e| e.max(candidate)));
                }
            }
        }

        match (trim_start, trim_end) {
            (Some(start), Some(end)) if start < end => Some(TrimRegion { start, end }),
            _ => None,
        }
    }

    /// Trim a channel, returning the kept samples and the region if one was cut
    pub fn trim(&self, mut samples: Vec<f32>) -> (Vec<f32>, Option<TrimRegion>) {
        let region = self.find_region(&samples);
        if let Some(TrimRegion { start, end }) = region {
            samples.truncate(end);
            samples.drain(..start);
        }
        (samples, region)
    }

    /// Trim every channel of a buffer by the region found on its first channel
    pub fn process(&self, buffer: AudioBuffer) -> (AudioBuffer, Option<TrimRegion>) {
        let Some(region) = buffer.samples.first().and_then(|ch| self.find_region(ch)) else {
            return (buffer, None);
        };

        let AudioBuffer {
            samples,
            sample_rate,
        } = buffer;
        let samples = samples
            .into_iter()
            .map(|mut channel| {
                channel.truncate(region.end);
                channel.drain(..region.start);
                channel
            })
            .collect();

        (
            AudioBuffer {
                samples,
                sample_rate,
            },
            Some(region),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
