//! Component extraction via `cabextract`

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use super::describe;
use crate::error::{InstallCabError, Result};

/// Glob handed to `cabextract -F` for a component name
pub fn component_filter(component: &str) -> String {
    format!("*{component}*")
}

/// Extract every file matching `component` from `archive` into `dest`
///
/// Returns all files found under `dest` afterwards, sorted by path.
pub fn extract(program: &str, archive: &Path, component: &str, dest: &Path) -> Result<Vec<PathBuf>> {
    let filter = component_filter(component);
    let args = [
        OsStr::new("-F"),
        OsStr::new(&filter),
        OsStr::new("-d"),
        dest.as_os_str(),
        archive.as_os_str(),
    ];
    log::debug!("running {}", describe(program, &args));

    let failed = |reason: String| InstallCabError::ExtractionFailed {
        archive: archive.display().to_string(),
        reason,
    };

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| failed(format!("could not run {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("{program} exited with {}", output.status),
            message => message.to_string(),
        };
        return Err(failed(reason));
    }

    collect_files(dest)
}

/// All regular files below `dir`, sorted so runs are reproducible
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| InstallCabError::IoError {
            message: format!("failed to walk {}: {e}", dir.display()),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
