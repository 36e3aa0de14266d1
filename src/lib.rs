//! Deepfry - Audio Degradation Pipeline
//!
//! Destroys audio fidelity on purpose by running it through a lossy codec
//! over and over, boosting and clipping after every pass.
//!
//! # Architecture
//!
//! - `engine`: audio buffer type and WAV container I/O
//! - `dsp`: clip functions, gain stage, mono downmix, noise trimmer
//! - `codec`: the lossy codec boundary and its LAME implementation
//! - `pipeline`: the orchestrator, scratch files and random bitrate source
//! - `cli`: command-line surface

pub mod cli;
pub mod codec;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{DeepFryError, ErrorKind, Result};
