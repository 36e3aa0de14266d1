//! DSP Stages
//!
//! Signal processing applied by the degradation pipeline.
//! Order per run: Downmix → (Gain + Clip) × iterations → Trim.

mod clip;
mod downmix;
mod gain;
mod trim;

pub use clip::ClipFunction;
pub use downmix::downmix_to_mono;
pub use gain::GainStage;
pub use trim::{NoiseTrimmer, TrimConfig, TrimRegion};
