//! Pipeline configuration
//!
//! Built once before a run (defaults, then an optional JSON file, then
//! command-line overrides) and read-only afterwards.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::{ClipFunction, TrimConfig};
use crate::error::{DeepFryError, Result};

/// Bitrates (kbps) drawn from on each iteration
pub const DEFAULT_BITRATES: [u32; 5] = [32, 40, 48, 56, 64];

/// Number of encode/decode/boost cycles
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Boost applied after every decode
pub const DEFAULT_BOOST_DB: f32 = 10.0;

/// Bitrate of the file written at the end
pub const DEFAULT_FINAL_BITRATE: u32 = 192;

/// Immutable settings for one degradation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bitrate pool in kbps; one is picked uniformly per iteration
    pub bitrates: Vec<u32>,
    /// Number of encode/decode/boost cycles
    pub iterations: u32,
    /// Gain boost in dB applied after each decode
    pub boost_db: f32,
    /// Clip function applied after the boost
    pub clip: ClipFunction,
    /// Whether to trim noisy lead-in and tail after the loop
    pub trim: bool,
    /// Noise trimmer parameters
    pub trimmer: TrimConfig,
    /// Bitrate of the final output encode
    pub final_bitrate: u32,
    /// Seed for the bitrate draw; entropy when absent
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bitrates: DEFAULT_BITRATES.to_vec(),
            iterations: DEFAULT_ITERATIONS,
            boost_db: DEFAULT_BOOST_DB,
            clip: ClipFunction::default(),
            trim: false,
            trimmer: TrimConfig::default(),
            final_bitrate: DEFAULT_FINAL_BITRATE,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DeepFryError::FileNotFound {
            path: path.display().to_string(),
            source: Some(e),
        })?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.bitrates.is_empty() {
            return Err(DeepFryError::config("bitrate pool must not be empty"));
        }
        if self.bitrates.contains(&0) {
            return Err(DeepFryError::config("bitrates must be positive"));
        }
        if self.iterations == 0 {
            return Err(DeepFryError::config("iterations must be at least 1"));
        }
        if !self.boost_db.is_finite() {
            return Err(DeepFryError::config(format!(
                "boost must be a finite number of dB, got {}",
                self.boost_db
            )));
        }
        let slope = self.clip.slope();
        if !slope.is_finite() || slope <= 0.0 {
            return Err(DeepFryError::config(format!(
                "clip slope must be positive, got {}",
                slope
            )));
        }
        if self.final_bitrate == 0 {
            return Err(DeepFryError::config("final bitrate must be positive"));
        }
        self.trimmer.validate()
    }
}
