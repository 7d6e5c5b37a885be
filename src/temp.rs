//! Scratch directories for a single run
//!
//! Never based on a relative path, so scratch space is never created under the
//! current working directory (e.g. when TMPDIR=tmp or TMPDIR=./tmp).

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::{InstallCabError, Result};

/// Returns a directory path suitable for creating temporary directories.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create the run's scratch directory; it is removed with everything in it on drop
pub fn create_scratch_dir() -> Result<TempDir> {
    let base = temp_dir_base();
    tempfile::Builder::new()
        .prefix("installcab-")
        .tempdir_in(&base)
        .map_err(|e| InstallCabError::FileWriteFailed {
            path: base.display().to_string(),
            reason: e.to_string(),
        })
}
