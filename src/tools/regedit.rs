//! Registry import via `wine regedit`

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::describe;

/// Import `script` into the prefix at `prefix` using `program regedit`
///
/// The helper's exit status does not reliably signal success, so failures
/// are reported and otherwise ignored. Returns whether the helper ran and
/// exited cleanly.
pub fn import(program: &str, prefix: &Path, script: &Path) -> bool {
    let args = [OsStr::new("regedit"), script.as_os_str()];
    let command_line = describe(program, &args);
    log::debug!("running {command_line} with WINEPREFIX={}", prefix.display());

    match Command::new(program)
        .args(args)
        .env("WINEPREFIX", prefix)
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log::warn!("{command_line} exited with {status}");
            false
        }
        Err(e) => {
            log::warn!("could not run {command_line}: {e}");
            false
        }
    }
}
