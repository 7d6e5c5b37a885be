//! File installation operations
//!
//! This module handles:
//! - Sorting extracted files into manifests and libraries
//! - Directory creation
//! - Copying libraries into the prefix, replacing older copies

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallCabError, Result};

/// What an extracted file is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Manifest,
    Library,
}

impl ArtifactKind {
    /// Classify by suffix; other files (catalogs, mui, ...) are ignored
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "manifest" => Some(ArtifactKind::Manifest),
            "dll" => Some(ArtifactKind::Library),
            _ => None,
        }
    }
}

/// Extracted files of one kind, in their original order
pub fn artifacts_of(files: &[PathBuf], kind: ArtifactKind) -> impl Iterator<Item = &PathBuf> {
    files
        .iter()
        .filter(move |path| ArtifactKind::of(path) == Some(kind))
}

/// Ensure a directory exists
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| InstallCabError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// File name of `path` for display and derived names
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Script name for a manifest, unique among files extracted under `root`
///
/// `a/test.manifest` -> `a_test.manifest.reg`; a manifest directly in `root`
/// keeps its own name.
pub fn script_name(manifest: &Path, root: &Path) -> String {
    let relative = manifest.strip_prefix(root).unwrap_or(manifest);
    let flat = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_");
    format!("{flat}.reg")
}

/// Copy `source` into `dest_dir`, overwriting a file of the same name
pub fn install_file(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    ensure_dir(dest_dir)?;
    let target = dest_dir.join(file_name(source));
    fs::copy(source, &target).map_err(|e| InstallCabError::FileWriteFailed {
        path: target.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(target)
}
