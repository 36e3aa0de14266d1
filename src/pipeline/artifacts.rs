//! Temporary artifacts
//!
//! The degrader owns two scratch files for the whole run: one compressed,
//! one raw WAV. Every iteration overwrites them completely. They are
//! removed when the run ends, whichever way it ends.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{DeepFryError, Result};

/// File name of the compressed scratch file
pub const COMPRESSED_FILE_NAME: &str = "_temp-mpeg.mp3";

/// File name of the raw scratch file
pub const RAW_FILE_NAME: &str = "_temp-wave.wav";

/// Scoped pair of scratch files
///
/// Call [`TempArtifacts::cleanup`] to remove them and observe failures.
/// If that never happens (e.g. a panic unwinds through the run), `Drop`
/// removes them on a best-effort basis.
#[derive(Debug)]
pub struct TempArtifacts {
    compressed: PathBuf,
    raw: PathBuf,
    cleaned: bool,
}

impl TempArtifacts {
    /// Reserve the scratch paths inside `dir`; no file is created yet
    pub fn new(dir: &Path) -> Self {
        Self {
            compressed: dir.join(COMPRESSED_FILE_NAME),
            raw: dir.join(RAW_FILE_NAME),
            cleaned: false,
        }
    }

    /// Path of the compressed scratch file
    pub fn compressed(&self) -> &Path {
        &self.compressed
    }

    /// Path of the raw WAV scratch file
    pub fn raw(&self) -> &Path {
        &self.raw
    }

    /// Both scratch paths
    pub fn paths(&self) -> [&Path; 2] {
        [&self.compressed, &self.raw]
    }

    /// Remove both files
    ///
    /// A file that does not exist is not an error. Every path is attempted
    /// even if an earlier removal failed; the first failure is returned.
    pub fn cleanup(&mut self) -> Result<()> {
        self.cleaned = true;
        let mut first_error = None;

        for path in [&self.compressed, &self.raw] {
            if let Err(e) = remove_if_exists(path) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        if self.cleaned {
            return;
        }
        for path in [&self.compressed, &self.raw] {
            if let Err(e) = remove_if_exists(path) {
                warn!("{}", e);
            }
        }
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DeepFryError::Cleanup {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
