//! Integration Tests
//!
//! End-to-end runs of the degradation pipeline against the mock codec.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::{tempdir, TempDir};

use deepfry::codec::mock::MockCodec;
use deepfry::dsp::{downmix_to_mono, ClipFunction, TrimConfig};
use deepfry::engine::{decode_wav, read_wav, write_wav, AudioBuffer, InputFormat};
use deepfry::pipeline::{Degrader, PipelineEvent, RngSource, SequenceSource};
use deepfry::{DeepFryError, ErrorKind, PipelineConfig};

/// Scratch directory with input/output paths inside it
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_input(&self, name: &str, buffer: &AudioBuffer) -> PathBuf {
        let path = self.path(name);
        write_wav(buffer, &path, 16).unwrap();
        path
    }

    fn temp_files_exist(&self) -> bool {
        self.path("_temp-mpeg.mp3").exists() || self.path("_temp-wave.wav").exists()
    }
}

fn random_samples(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..=1.0)).collect()
}

fn single_pass_config() -> PipelineConfig {
    PipelineConfig {
        bitrates: vec![64],
        iterations: 1,
        boost_db: 0.0,
        clip: ClipFunction::Hard(1.0),
        trim: false,
        ..PipelineConfig::default()
    }
}

fn degrader(
    config: PipelineConfig,
    codec: MockCodec,
    temp_dir: &Path,
) -> Degrader<MockCodec, SequenceSource> {
    Degrader::new(config, codec, SequenceSource::new(vec![0, 1, 2, 3, 4]))
        .unwrap()
        .with_temp_dir(temp_dir)
}

// === Scenario A: single pass keeps every sample ===

#[test]
fn test_single_pass_preserves_sample_count() {
    let ws = Workspace::new();
    let input = ws.write_input("noise.wav", &AudioBuffer::mono(random_samples(1000, 1), 44100));
    let output = ws.path("fried.mp3");

    let mut degrader = degrader(single_pass_config(), MockCodec::new(), ws.dir.path());
    let summary = degrader.run(&input, &output).unwrap();

    assert_eq!(summary.input_samples, 1000);
    assert_eq!(summary.output_samples, 1000);
    assert_eq!(summary.bitrates, vec![64]);
    assert!(output.exists());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);

    // The mock's "compressed" output is WAV, so it can be inspected
    let written = read_wav(&output).unwrap();
    assert_eq!(written.len(), 1000);
    assert!(!ws.temp_files_exist());
}

// === Scenario B: stereo input is averaged ===

#[test]
fn test_downmix_of_constant_channels() {
    let buffer =
        AudioBuffer::from_channels(vec![vec![0.2; 500], vec![0.6; 500]], 44100).unwrap();
    let mono = downmix_to_mono(buffer).unwrap();

    assert_eq!(mono.channels(), 1);
    assert_eq!(mono.len(), 500);
    for &sample in mono.channel(0) {
        assert_abs_diff_eq!(sample, 0.4, epsilon = 1e-6);
    }
}

#[test]
fn test_stereo_file_is_fried_to_mono() {
    let ws = Workspace::new();
    let input = ws.write_input(
        "stereo.wav",
        &AudioBuffer::from_channels(vec![vec![0.2; 500], vec![0.6; 500]], 44100).unwrap(),
    );
    let output = ws.path("mono.mp3");

    let mut degrader = degrader(single_pass_config(), MockCodec::new(), ws.dir.path());
    let summary = degrader.run(&input, &output).unwrap();

    assert_eq!(summary.input_channels, 2);
    let written = read_wav(&output).unwrap();
    assert_eq!(written.channels(), 1);
    for &sample in written.channel(0) {
        // Two 16-bit quantisation steps on the way
        assert_abs_diff_eq!(sample, 0.4, epsilon = 1e-3);
    }
}

// === Scenario C: noisy lead-in and tail are trimmed ===

#[test]
fn test_trim_keeps_quiet_middle() {
    let ws = Workspace::new();
    let samples: Vec<f32> = (0..600)
        .map(|i| match i {
            200..=399 => 0.0,
            _ if i % 2 == 0 => 0.9,
            _ => -0.9,
        })
        .collect();
    let input = ws.write_input("sandwich.wav", &AudioBuffer::mono(samples, 8000));
    let output = ws.path("trimmed.mp3");

    let config = PipelineConfig {
        trim: true,
        trimmer: TrimConfig {
            integrator_window: 4,
            average_window: 8,
            ..TrimConfig::default()
        },
        ..single_pass_config()
    };
    let mut degrader = degrader(config, MockCodec::new(), ws.dir.path());

    let mut trimmed_event = None;
    let summary = degrader
        .run_with_progress(&input, &output, |event| {
            if let PipelineEvent::Trimmed { region } = event {
                trimmed_event = Some(*region);
            }
        })
        .unwrap();

    let region = summary.trim_region.expect("region should be trimmed");
    assert_eq!(trimmed_event, Some(region));
    assert!(region.start >= 200 && region.end <= 400, "{:?}", region);
    assert_eq!(summary.output_samples, region.end - region.start);
    assert!(summary.output_samples < 600);
}

#[test]
fn test_trim_disabled_keeps_everything() {
    let ws = Workspace::new();
    let samples: Vec<f32> = (0..600)
        .map(|i| if (200..400).contains(&i) { 0.0 } else { 0.9 })
        .collect();
    let input = ws.write_input("flat.wav", &AudioBuffer::mono(samples, 8000));

    let mut degrader = degrader(single_pass_config(), MockCodec::new(), ws.dir.path());
    let summary = degrader.run(&input, &ws.path("out.mp3")).unwrap();

    assert_eq!(summary.trim_region, None);
    assert_eq!(summary.output_samples, 600);
}

// === Scenario D: unsupported input type ===

#[test]
fn test_unsupported_extension_creates_nothing() {
    let ws = Workspace::new();
    let input = ws.path("voice.ogg");
    std::fs::write(&input, b"OggS").unwrap();
    let output = ws.path("out.mp3");

    let mut degrader = degrader(single_pass_config(), MockCodec::new(), ws.dir.path());
    let err = degrader.run(&input, &output).unwrap_err();

    assert!(matches!(err, DeepFryError::UnsupportedFormat { ref extension } if extension == ".ogg"));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(err.exit_code(), 1);
    assert!(!output.exists());
    assert!(!ws.temp_files_exist());
    assert_eq!(degrader.codec().encode_calls(), 0);
}

// === Scenario E: missing input file ===

#[test]
fn test_missing_input_is_input_error() {
    let ws = Workspace::new();
    let mut degrader = degrader(single_pass_config(), MockCodec::new(), ws.dir.path());

    let mut events = Vec::new();
    let err = degrader
        .run_with_progress(&ws.path("ghost.wav"), &ws.path("out.mp3"), |e| {
            events.push(e.clone())
        })
        .unwrap_err();

    assert!(matches!(err, DeepFryError::FileNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(events.is_empty());
    assert!(!ws.temp_files_exist());
}

// === Loop count and bitrate pool ===

#[test]
fn test_loop_runs_exactly_iteration_count() {
    let ws = Workspace::new();
    let input = ws.write_input("tone.wav", &AudioBuffer::mono(random_samples(256, 2), 22050));
    let pool = vec![32, 40, 48, 56, 64];
    let config = PipelineConfig {
        bitrates: pool.clone(),
        iterations: 17,
        ..PipelineConfig::default()
    };

    let mut degrader = Degrader::new(config, MockCodec::new(), RngSource::seeded(1234))
        .unwrap()
        .with_temp_dir(ws.dir.path());
    let mut iterations = Vec::new();
    let summary = degrader
        .run_with_progress(&input, &ws.path("out.mp3"), |event| {
            if let PipelineEvent::Iteration { index, total, .. } = event {
                iterations.push((*index, *total));
            }
        })
        .unwrap();

    assert_eq!(summary.bitrates.len(), 17);
    assert!(summary.bitrates.iter().all(|b| pool.contains(b)));
    assert_eq!(iterations, (1..=17).map(|i| (i, 17)).collect::<Vec<_>>());

    // 17 loop encodes plus the final one at the output bitrate
    let codec = degrader.codec();
    assert_eq!(codec.encode_calls(), 18);
    assert_eq!(codec.decode_calls(), 17);
    assert_eq!(codec.bitrates().last(), Some(&192));
    assert_eq!(&codec.bitrates()[..17], summary.bitrates.as_slice());
}

#[test]
fn test_boost_and_clip_applied_every_iteration() {
    let ws = Workspace::new();
    let input = ws.write_input("quiet.wav", &AudioBuffer::mono(vec![0.01; 64], 8000));
    let output = ws.path("loud.mp3");
    let config = PipelineConfig {
        iterations: 3,
        boost_db: 20.0,
        clip: ClipFunction::Hard(1.0),
        ..single_pass_config()
    };

    let mut degrader = degrader(config, MockCodec::new(), ws.dir.path());
    degrader.run(&input, &output).unwrap();

    // 0.01 -> 0.1 -> 1.0 -> clipped at 1.0
    let written = decode_wav(&std::fs::read(&output).unwrap()).unwrap();
    for &sample in written.channel(0) {
        assert_abs_diff_eq!(sample, 1.0, epsilon = 1e-3);
    }
}

// === Compressed input and cleanup ===

#[test]
fn test_mp3_input_goes_through_codec_decode() {
    let ws = Workspace::new();
    // The mock codec's compressed format is WAV, so WAV bytes stand in for MP3
    let input = ws.write_input("track.MP3", &AudioBuffer::mono(random_samples(300, 3), 16000));

    let mut degrader = degrader(single_pass_config(), MockCodec::new(), ws.dir.path());
    let mut decoding = false;
    let summary = degrader
        .run_with_progress(&input, &ws.path("out.mp3"), |event| {
            decoding |= matches!(event, PipelineEvent::Decoding(_));
        })
        .unwrap();

    assert!(decoding);
    assert_eq!(summary.input_format, InputFormat::Mpeg);
    // Input decode plus one loop decode
    assert_eq!(degrader.codec().decode_calls(), 2);
    assert!(!ws.temp_files_exist());
}

#[test]
fn test_codec_failure_still_cleans_up() {
    let ws = Workspace::new();
    let input = ws.write_input("in.wav", &AudioBuffer::mono(random_samples(128, 4), 8000));
    let output = ws.path("out.mp3");
    let config = PipelineConfig {
        iterations: 5,
        ..single_pass_config()
    };

    let mut degrader = degrader(config, MockCodec::new().fail_on_encode(4), ws.dir.path());
    let mut cleaned = false;
    let err = degrader
        .run_with_progress(&input, &output, |event| {
            cleaned |= *event == PipelineEvent::CleaningUp;
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Codec);
    assert_eq!(err.exit_code(), 2);
    assert!(cleaned);
    assert!(!output.exists());
    assert!(!ws.temp_files_exist());
}

#[test]
fn test_final_encode_failure_cleans_up() {
    let ws = Workspace::new();
    let input = ws.write_input("in.wav", &AudioBuffer::mono(random_samples(128, 5), 8000));
    let output = ws.path("out.mp3");

    // Encode #2 is the final encode of a single-iteration run
    let mut degrader = degrader(single_pass_config(), MockCodec::new().fail_on_encode(2), ws.dir.path());
    assert!(degrader.run(&input, &output).is_err());
    assert!(!output.exists());
    assert!(!ws.temp_files_exist());
}
