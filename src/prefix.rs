//! Wine prefix (target environment) detection
//!
//! The prefix architecture is read once from the `#arch=` marker Wine writes
//! into `user.reg` and stays fixed for the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::arch::TargetArch;
use crate::error::{InstallCabError, Result};

/// Registry hive carrying the `#arch=` marker
const CONFIG_RECORD: &str = "user.reg";

const ARCH_MARKER: &str = "#arch=";

/// A Wine prefix and its resolved architecture
#[derive(Debug, Clone)]
pub struct TargetEnvironment {
    pub root: PathBuf,
    pub arch: TargetArch,
}

impl TargetEnvironment {
    /// Open a prefix, resolving its architecture from the configuration record
    pub fn open(root: &Path) -> Result<Self> {
        let record = root.join(CONFIG_RECORD);
        let content =
            fs::read_to_string(&record).map_err(|e| InstallCabError::UnknownTargetArchitecture {
                path: record.display().to_string(),
                reason: e.to_string(),
            })?;

        let arch = detect_arch(&content).ok_or_else(|| {
            InstallCabError::UnknownTargetArchitecture {
                path: record.display().to_string(),
                reason: "no '#arch=win32' or '#arch=win64' line".to_string(),
            }
        })?;

        log::debug!("prefix {} is {}", root.display(), arch);

        Ok(Self {
            root: root.to_path_buf(),
            arch,
        })
    }

    /// `C:\windows` as seen from the host
    pub fn windows_dir(&self) -> PathBuf {
        self.root.join("drive_c").join("windows")
    }

    /// Host path of a system directory such as `System32` or `Syswow64`
    ///
    /// Wine creates these in lowercase, and host filesystems may be case sensitive.
    pub fn system_dir(&self, name: &str) -> PathBuf {
        self.windows_dir().join(name.to_ascii_lowercase())
    }
}

/// First `#arch=` marker line that names a supported architecture
fn detect_arch(content: &str) -> Option<TargetArch> {
    content.lines().find_map(|line| {
        line.strip_prefix(ARCH_MARKER)
            .and_then(|value| TargetArch::from_marker(value.trim()))
    })
}
