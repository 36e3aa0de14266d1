//! CLI Module
//!
//! Command-line interface for the Deepfry degrader.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

use crate::codec::DEFAULT_LAME_BINARY;
use crate::config::PipelineConfig;
use crate::dsp::ClipFunction;
use crate::error::Result;

/// Deepfry - destroys audio by compressing it over and over
#[derive(Parser, Debug)]
#[command(name = "deepfry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source audio file (.wav or .mp3)
    pub input: Option<PathBuf>,

    /// Destination MP3 file
    pub output: Option<PathBuf>,

    /// Number of encode/decode/boost cycles
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Bitrate pool in kbps (repeat to add more)
    #[arg(short, long = "bitrate", value_name = "KBPS")]
    pub bitrates: Vec<u32>,

    /// Boost in dB applied after every decode
    #[arg(long, value_name = "DB", allow_hyphen_values = true)]
    pub boost: Option<f32>,

    /// Clip function: hard, soft or diode, with optional slope (e.g. soft:10)
    #[arg(long, value_name = "KIND[:SLOPE]")]
    pub clip: Option<ClipFunction>,

    /// Trim noisy lead-in and tail before the final encode
    #[arg(long)]
    pub trim: bool,

    /// Bitrate of the final output in kbps
    #[arg(long, value_name = "KBPS")]
    pub final_bitrate: Option<u32>,

    /// Seed for the bitrate draw, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON pipeline configuration; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the temporary files (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Path to the LAME encoder binary
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LAME_BINARY)]
    pub lame: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the pipeline configuration: defaults, then the config file, then flags
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if !self.bitrates.is_empty() {
            config.bitrates = self.bitrates.clone();
        }
        if let Some(boost) = self.boost {
            config.boost_db = boost;
        }
        if let Some(clip) = self.clip {
            config.clip = clip;
        }
        if self.trim {
            config.trim = true;
        }
        if let Some(final_bitrate) = self.final_bitrate {
            config.final_bitrate = final_bitrate;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}
