//! Audio Engine Module
//!
//! Core audio types shared by every pipeline stage:
//! - Audio buffer management
//! - WAV container encode/decode

pub mod buffer;
pub mod io;

pub use buffer::{calculate_peak, db_to_linear, linear_to_db, AudioBuffer, OUTPUT_BIT_DEPTH};
pub use io::{decode_wav, encode_wav, read_wav, write_wav, InputFormat};
