//! Degradation orchestrator
//!
//! Sequences one run:
//! `load → downmix → (encode → decode → boost) × N → trim? → final encode → cleanup`.
//! The working buffer is moved from stage to stage; each iteration replaces
//! it with whatever the codec hands back.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::Serialize;

use crate::codec::LossyCodec;
use crate::config::PipelineConfig;
use crate::dsp::{downmix_to_mono, GainStage, NoiseTrimmer, TrimRegion};
use crate::engine::{calculate_peak, decode_wav, AudioBuffer, InputFormat};
use crate::error::{DeepFryError, Result};
use crate::pipeline::artifacts::TempArtifacts;
use crate::pipeline::random::RandomSource;

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Compressed input is being decoded
    Decoding(PathBuf),
    /// Input is being reduced to one channel
    Downmixing { channels: usize },
    /// An iteration is starting (`index` is 1-based)
    Iteration {
        index: u32,
        total: u32,
        bitrate: u32,
    },
    /// Noise trimming is starting
    Trimming,
    /// Noise trimming removed samples outside `region`
    Trimmed { region: TrimRegion },
    /// Final encode to the output path
    Writing(PathBuf),
    /// Temporary files are being removed
    CleaningUp,
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub input_format: InputFormat,
    pub input_channels: usize,
    pub input_samples: usize,
    pub output_samples: usize,
    /// Bitrate chosen for each iteration, in order
    pub bitrates: Vec<u32>,
    pub trim_region: Option<TrimRegion>,
    pub output_bytes: usize,
}

/// Drives the degradation loop over a codec and a random source
pub struct Degrader<C, R> {
    config: PipelineConfig,
    codec: C,
    random: R,
    temp_dir: PathBuf,
}

impl<C: LossyCodec, R: RandomSource> Degrader<C, R> {
    /// Create a degrader; scratch files go to the current directory
    ///
    /// # Errors
    /// * `InvalidConfig` - if `config` fails validation
    pub fn new(config: PipelineConfig, codec: C, random: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codec,
            random,
            temp_dir: PathBuf::from("."),
        })
    }

    /// Put the scratch files in `dir` instead
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Degrade `input` into `output`
    pub fn run(&mut self, input: &Path, output: &Path) -> Result<RunSummary> {
        self.run_with_progress(input, output, |_| {})
    }

    /// Degrade `input` into `output`, reporting progress to `on_event`
    ///
    /// Input errors are reported before any scratch file exists. Once the
    /// scratch files are reserved they are removed on every exit path; a
    /// cleanup failure is returned unless an earlier error takes precedence.
    pub fn run_with_progress<F>(
        &mut self,
        input: &Path,
        output: &Path,
        mut on_event: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&PipelineEvent),
    {
        let format = InputFormat::from_path(input)?;
        let data = fs::read(input).map_err(|e| DeepFryError::FileNotFound {
            path: input.display().to_string(),
            source: Some(e),
        })?;

        let mut artifacts = TempArtifacts::new(&self.temp_dir);
        let outcome = self.process(format, input, &data, output, &artifacts, &mut on_event);

        on_event(&PipelineEvent::CleaningUp);
        let cleanup = artifacts.cleanup();

        match (outcome, cleanup) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_error)) => {
                error!("{}", cleanup_error);
                Err(e)
            }
        }
    }

    fn process<F>(
        &mut self,
        format: InputFormat,
        input: &Path,
        data: &[u8],
        output: &Path,
        scratch: &TempArtifacts,
        on_event: &mut F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&PipelineEvent),
    {
        let buffer = match format {
            InputFormat::Mpeg => {
                info!("Decoding {}", input.display());
                on_event(&PipelineEvent::Decoding(input.to_path_buf()));
                self.codec.decode(data, scratch)?
            }
            InputFormat::Wave => decode_wav(data)?,
        };

        let input_channels = buffer.channels();
        let input_samples = buffer.len();
        info!(
            "Loaded {} channel(s), {} samples at {} Hz",
            input_channels, input_samples, buffer.sample_rate
        );

        on_event(&PipelineEvent::Downmixing {
            channels: input_channels,
        });
        let working = downmix_to_mono(buffer)?;

        let (working, bitrates) = self.degrade(working, scratch, on_event)?;

        let (working, trim_region) = if self.config.trim {
            on_event(&PipelineEvent::Trimming);
            let (trimmed, region) = NoiseTrimmer::new(self.config.trimmer).process(working);
            match region {
                Some(region) => {
                    info!("Trimmed to samples {}..{}", region.start, region.end);
                    on_event(&PipelineEvent::Trimmed { region });
                }
                None => info!("Nothing to trim"),
            }
            (trimmed, region)
        } else {
            (working, None)
        };

        info!("Writing {}", output.display());
        on_event(&PipelineEvent::Writing(output.to_path_buf()));
        let encoded = self
            .codec
            .encode(&working, self.config.final_bitrate, scratch)?;
        fs::write(output, &encoded)?;

        Ok(RunSummary {
            input_format: format,
            input_channels,
            input_samples,
            output_samples: working.len(),
            bitrates,
            trim_region,
            output_bytes: encoded.len(),
        })
    }

    /// Run the encode/decode/boost loop on an in-memory buffer
    ///
    /// Returns the degraded buffer and the bitrate chosen for each
    /// iteration. The first codec failure aborts the loop.
    pub fn degrade<F>(
        &mut self,
        mut working: AudioBuffer,
        scratch: &TempArtifacts,
        on_event: &mut F,
    ) -> Result<(AudioBuffer, Vec<u32>)>
    where
        F: FnMut(&PipelineEvent),
    {
        let total = self.config.iterations;
        let pool = &self.config.bitrates;
        let gain = GainStage::new(self.config.boost_db, self.config.clip);
        let mut chosen = Vec::with_capacity(total as usize);

        for index in 1..=total {
            let bitrate = pool[self.random.choose_index(pool.len()) % pool.len()];
            on_event(&PipelineEvent::Iteration {
                index,
                total,
                bitrate,
            });

            let compressed = self.codec.encode(&working, bitrate, scratch)?;
            working = self.codec.decode(&compressed, scratch)?;
            gain.process(&mut working);

            debug!(
                "Iteration {}/{} at {} kbps via {}: {} bytes, peak {:.1} dBFS",
                index,
                total,
                bitrate,
                self.codec.name(),
                compressed.len(),
                calculate_peak(&working)
            );
            chosen.push(bitrate);
        }

        Ok((working, chosen))
    }
}

// ============================================================================
// Tests
// ============================================================================
