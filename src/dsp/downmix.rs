//! Mono downmix

use crate::engine::AudioBuffer;
use crate::error::{DeepFryError, Result};

/// Average all channels into one
///
/// `result[i] = (1/C) * sum_j channel_j[i]`. A mono buffer is returned
/// unchanged.
///
/// # Errors
/// * `InvalidAudio` - if the buffer has no channels
pub fn downmix_to_mono(buffer: AudioBuffer) -> Result<AudioBuffer> {
    let AudioBuffer {
        mut samples,
        sample_rate,
    } = buffer;

    match samples.len() {
        0 => Err(DeepFryError::InvalidAudio {
            reason: "cannot downmix audio with no channels".to_string(),
            source: None,
        }),
        1 => Ok(AudioBuffer {
            samples,
            sample_rate,
        }),
        num_channels => {
            let scale = 1.0 / num_channels as f32;
            // Reuse the first channel's allocation as the sum
            let mut mono = samples.swap_remove(0);
            for (i, out) in mono.iter_mut().enumerate() {
                let sum: f32 = *out + samples.iter().map(|ch| ch[i]).sum::<f32>();
                *out = sum * scale;
            }
            Ok(AudioBuffer::mono(mono, sample_rate))
        }
    }
}
