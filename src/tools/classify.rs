//! DLL bitness detection via `file`

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::describe;
use crate::arch::Arch;
use crate::error::{InstallCabError, Result};

/// Substring `file` prints for 64-bit x86 PE images
const X86_64_MARKER: &str = "x86-64";

/// Architecture implied by a `file` description
pub fn arch_from_description(description: &str) -> Arch {
    if description.contains(X86_64_MARKER) {
        Arch::Win64
    } else {
        Arch::Win32
    }
}

/// Classify a DLL by running `file -b` on it
///
/// Brief mode keeps the path out of the description, so a directory name
/// containing the marker cannot skew the result.
pub fn classify_dll(program: &str, path: &Path) -> Result<Arch> {
    let args = [OsStr::new("-b"), path.as_os_str()];
    log::debug!("running {}", describe(program, &args));

    let failed = |reason: String| InstallCabError::ClassificationFailed {
        path: path.display().to_string(),
        reason,
    };

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| failed(format!("could not run {program}: {e}")))?;

    if !output.status.success() {
        return Err(failed(format!("{program} exited with {}", output.status)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let description = stdout.trim();
    if description.is_empty() {
        return Err(failed(format!("{program} printed no description")));
    }

    let arch = arch_from_description(description);
    log::debug!("{} is {arch} ({description})", path.display());
    Ok(arch)
}
