//! Clip Functions
//!
//! Bounded waveshapers applied after the gain boost. Every variant maps a
//! finite sample into [-1, 1] for any positive slope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeepFryError;

// ============================================================================
// Waveshaping Functions
// ============================================================================

/// Hard clip: amplify then clamp to [-1, 1]
#[inline]
fn waveshape_hard(x: f32, slope: f32) -> f32 {
    (x * slope).clamp(-1.0, 1.0)
}

/// Soft clip: tanh(x * slope)
#[inline]
fn waveshape_soft(x: f32, slope: f32) -> f32 {
    (x * slope).tanh()
}

/// Diode: sign-preserving power law |x|^(1/slope), clamped
#[inline]
fn waveshape_diode(x: f32, slope: f32) -> f32 {
    // f32::signum(0.0) is 1.0
    if x == 0.0 {
        return 0.0;
    }
    (x.signum() * x.abs().powf(slope.recip())).clamp(-1.0, 1.0)
}

// ============================================================================
// Clip Function
// ============================================================================

/// Clip function applied to every boosted sample
///
/// # Variants
/// - **Hard**: `clamp(x * slope, -1, 1)`
/// - **Soft**: `tanh(x * slope)`
/// - **Diode**: `clamp(sign(x) * |x|^(1/slope), -1, 1)`, with `sign(0) = 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipFunction {
    Hard(f32),
    Soft(f32),
    Diode(f32),
}

impl ClipFunction {
    /// Map one sample through the clip function
    #[inline]
    pub fn apply(&self, sample: f32) -> f32 {
        match *self {
            ClipFunction::Hard(slope) => waveshape_hard(sample, slope),
            ClipFunction::Soft(slope) => waveshape_soft(sample, slope),
            ClipFunction::Diode(slope) => waveshape_diode(sample, slope),
        }
    }

    /// Slope parameter of the variant
    pub fn slope(&self) -> f32 {
        match *self {
            ClipFunction::Hard(slope) | ClipFunction::Soft(slope) | ClipFunction::Diode(slope) => {
                slope
            }
        }
    }

    /// Get string identifier
    pub fn to_str(&self) -> &'static str {
        match self {
            ClipFunction::Hard(_) => "hard",
            ClipFunction::Soft(_) => "soft",
            ClipFunction::Diode(_) => "diode",
        }
    }
}

impl Default for ClipFunction {
    fn default() -> Self {
        ClipFunction::Soft(10.0)
    }
}

impl fmt::Display for ClipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.to_str(), self.slope())
    }
}

impl FromStr for ClipFunction {
    type Err = DeepFryError;

    /// Parse `kind[:slope]`, e.g. `soft:10` or `hard`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, slope) = match s.split_once(':') {
            Some((kind, slope)) => {
                let slope = slope.trim().parse::<f32>().map_err(|_| {
                    DeepFryError::config(format!("invalid clip slope '{}'", slope))
                })?;
                (kind, slope)
            }
            None => (s, 1.0),
        };

        match kind.trim().to_lowercase().as_str() {
            "hard" | "hardclip" | "hard_clip" | "hard-clip" => Ok(ClipFunction::Hard(slope)),
            "soft" | "softclip" | "soft_clip" | "soft-clip" | "tanh" => {
                Ok(ClipFunction::Soft(slope))
            }
            "diode" => Ok(ClipFunction::Diode(slope)),
            other => Err(DeepFryError::config(format!(
                "unknown clip function '{}' (expected hard, soft or diode)",
                other
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
