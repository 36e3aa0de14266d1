//! CLI Command Implementations
//!
//! Runs the degrader with the LAME codec and prints progress in the
//! `- phase: detail` style.

use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::cli::Cli;
use crate::codec::LameCodec;
use crate::error::{DeepFryError, Result};
use crate::pipeline::{Degrader, PipelineEvent, RngSource, RunSummary};

/// Printed when source or destination is missing
pub const USAGE: &str = "Usage: deepfry <src-file[.wav|.mp3]> <dst-file[.mp3]>";

/// Run the command line and return the process exit code
///
/// `0` on success or when only the usage line was printed, otherwise
/// [`DeepFryError::exit_code`].
pub fn run(cli: &Cli) -> i32 {
    let (Some(input), Some(output)) = (&cli.input, &cli.output) else {
        println!("{}", USAGE);
        return 0;
    };

    match fry(cli, input, output) {
        Ok(summary) => {
            info!(
                "Done: {} -> {} samples, {} bytes written",
                summary.input_samples, summary.output_samples, summary.output_bytes
            );
            0
        }
        Err(DeepFryError::UnsupportedFormat { extension }) => {
            println!("- unsupported file type: {}", extension);
            1
        }
        Err(e) => {
            println!("- error: {}", e);
            for suggestion in e.recovery_suggestions() {
                println!("  hint: {}", suggestion);
            }
            debug!("{:?}", e);
            e.exit_code()
        }
    }
}

fn fry(cli: &Cli, input: &Path, output: &Path) -> Result<RunSummary> {
    let config = cli.pipeline_config()?;
    let random = match config.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };

    let mut degrader = Degrader::new(config, LameCodec::with_binary(&cli.lame), random)?;
    if let Some(dir) = &cli.temp_dir {
        degrader = degrader.with_temp_dir(dir);
    }

    let mut progress = ConsoleProgress::default();
    degrader.run_with_progress(input, output, |event| progress.show(event))
}

/// Prints pipeline events to stdout, rewriting the iteration counter in place
#[derive(Debug, Default)]
struct ConsoleProgress {
    counter_open: bool,
}

impl ConsoleProgress {
    fn show(&mut self, event: &PipelineEvent) {
        let Some(line) = describe(event) else {
            return;
        };

        let mut stdout = std::io::stdout().lock();
        // Console output is best-effort
        let _ = match event {
            PipelineEvent::Iteration { .. } => {
                self.counter_open = true;
                write!(stdout, "\r{}", line).and_then(|_| stdout.flush())
            }
            _ if self.counter_open => {
                self.counter_open = false;
                writeln!(stdout).and_then(|_| writeln!(stdout, "{}", line))
            }
            _ => writeln!(stdout, "{}", line),
        };
    }
}

/// Console line for an event, if it gets one
fn describe(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::Decoding(path) => Some(format!("- decoding: {}", path.display())),
        PipelineEvent::Downmixing { .. } => None,
        PipelineEvent::Iteration { index, total, .. } => {
            Some(format!("- iteration {}/{}", index, total))
        }
        PipelineEvent::Trimming => Some("- trimming".to_string()),
        PipelineEvent::Trimmed { region } => Some(format!(
            "- kept samples {}..{}",
            region.start, region.end
        )),
        PipelineEvent::Writing(path) => Some(format!("- writing: {}", path.display())),
        PipelineEvent::CleaningUp => Some("- cleaning up".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::TrimRegion;
    use clap::Parser;
    use std::ffi::OsStr;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_describe_events() {
        assert_eq!(
            describe(&PipelineEvent::Iteration {
                index: 3,
                total: 50,
                bitrate: 40
            })
            .as_deref(),
            Some("- iteration 3/50")
        );
        assert_eq!(
            describe(&PipelineEvent::Writing(PathBuf::from("out.mp3"))).as_deref(),
            Some("- writing: out.mp3")
        );
        assert_eq!(
            describe(&PipelineEvent::Trimmed {
                region: TrimRegion { start: 10, end: 20 }
            })
            .as_deref(),
            Some("- kept samples 10..20")
        );
        assert_eq!(describe(&PipelineEvent::Downmixing { channels: 2 }), None);
    }

    #[test]
    fn test_missing_arguments_exit_zero() {
        let cli = Cli::try_parse_from(["deepfry", "only-input.wav"]).unwrap();
        assert_eq!(run(&cli), 0);
    }

    #[test]
    fn test_unsupported_extension_exit_one() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("song.flac");
        std::fs::write(&input, b"fLaC").unwrap();
        let output = dir.path().join("out.mp3");

        let cli = Cli::try_parse_from([
            OsStr::new("deepfry"),
            input.as_os_str(),
            output.as_os_str(),
            OsStr::new("--temp-dir"),
            dir.path().as_os_str(),
        ])
        .unwrap();

        assert_eq!(run(&cli), 1);
        assert!(!output.exists());
        assert!(!dir.path().join("_temp-mpeg.mp3").exists());
        assert!(!dir.path().join("_temp-wave.wav").exists());
    }

    #[test]
    fn test_missing_input_exit_two() {
        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from([
            OsStr::new("deepfry"),
            dir.path().join("missing.wav").as_os_str(),
            dir.path().join("out.mp3").as_os_str(),
        ])
        .unwrap();

        assert_eq!(run(&cli), 2);
    }
}
