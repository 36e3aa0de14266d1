//! Degradation Pipeline
//!
//! The orchestrator plus the resources it owns for a run:
//! - Scratch file lifecycle
//! - Random bitrate selection

pub mod artifacts;
pub mod degrader;
pub mod random;

pub use artifacts::TempArtifacts;
pub use degrader::{Degrader, PipelineEvent, RunSummary};
pub use random::{RandomSource, RngSource, SequenceSource};
