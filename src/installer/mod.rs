//! Component installation into a Wine prefix
//!
//! The installation process:
//! 1. Resolve the prefix architecture
//! 2. Extract the component's files into a scratch directory
//! 3. Translate every manifest into a registry script
//! 4. Copy every DLL into the system directory matching its bitness
//! 5. Import each registry script with the matching `wine` variant
//! 6. Remove the scratch directory, also when any step above fails
//!
//! Nothing is rolled back: DLLs copied before a failure stay in place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use console::style;

use crate::arch::{self, Arch, HelperVariant};
use crate::error::Result;
use crate::manifest::{self, Manifest};
use crate::prefix::TargetEnvironment;
use crate::progress::Spinner;
use crate::temp;
use crate::tools::{Toolchain, cabextract, classify, regedit};

pub mod files;

use files::{ArtifactKind, artifacts_of};

const EXTRACT_DIR: &str = "extract";
const SCRIPTS_DIR: &str = "scripts";

/// Everything one run needs, passed explicitly to each phase
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub target: TargetEnvironment,
    pub tools: Toolchain,
    /// Scratch directory owned by the current run
    pub scratch: PathBuf,
}

/// A registry script written for one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedScript {
    pub path: PathBuf,
    pub arch: Arch,
}

/// A DLL copied into the prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledDll {
    pub name: String,
    pub arch: Arch,
    /// `System32` or `Syswow64`
    pub directory: &'static str,
    pub target_path: PathBuf,
}

/// A registry script handed to the import helper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedScript {
    pub name: String,
    pub variant: HelperVariant,
    /// Whether the helper exited cleanly; never fatal
    pub imported: bool,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub dlls: Vec<InstalledDll>,
    pub scripts: Vec<AppliedScript>,
}

/// Install `component` from `archive` into the prefix at `prefix`
///
/// The scratch directory lives exactly as long as this call.
pub fn run(prefix: &Path, tools: Toolchain, archive: &Path, component: &str) -> Result<InstallReport> {
    let target = TargetEnvironment::open(prefix)?;
    let scratch = temp::create_scratch_dir()?;

    let ctx = InstallContext {
        target,
        tools,
        scratch: scratch.path().to_path_buf(),
    };
    let report = ctx.install(archive, component)?;

    if let Err(e) = scratch.close() {
        log::warn!("failed to remove scratch directory: {e}");
    }
    Ok(report)
}

impl InstallContext {
    /// Extract, translate, copy and import, in that order
    pub fn install(&self, archive: &Path, component: &str) -> Result<InstallReport> {
        let files = self.extract(archive, component)?;
        let scripts = self.translate_manifests(&files)?;
        let dlls = self.install_dlls(&files)?;
        let scripts = self.apply_scripts(&scripts)?;
        Ok(InstallReport { dlls, scripts })
    }

    fn extract(&self, archive: &Path, component: &str) -> Result<Vec<PathBuf>> {
        println!("{}", style(component.trim_matches('_')).bold());

        let dest = self.scratch.join(EXTRACT_DIR);
        files::ensure_dir(&dest)?;

        let spinner = Spinner::new(format!("Extracting {}", archive.display()));
        let files = cabextract::extract(&self.tools.cabextract, archive, component, &dest)?;
        spinner.finish();

        log::info!("extracted {} files", files.len());
        Ok(files)
    }

    fn translate_manifests(&self, files: &[PathBuf]) -> Result<Vec<TranslatedScript>> {
        let scripts_dir = self.scratch.join(SCRIPTS_DIR);
        files::ensure_dir(&scripts_dir)?;

        let extract_dir = self.scratch.join(EXTRACT_DIR);
        let mut used = HashSet::new();
        let mut scripts = Vec::new();
        for path in artifacts_of(files, ArtifactKind::Manifest) {
            println!("- {}", path.strip_prefix(&extract_dir).unwrap_or(path).display());

            let manifest = Manifest::load(path)?;
            let script = manifest::translate(&manifest, self.target.arch)?;

            let base = files::script_name(path, &extract_dir);
            let mut name = base.clone();
            let mut n = 1;
            while !used.insert(name.clone()) {
                name = format!("{n}-{base}");
                n += 1;
            }
            let script_path = scripts_dir.join(name);
            script.write_to(&script_path)?;
            log::debug!("wrote {} ({})", script_path.display(), script.arch);

            scripts.push(TranslatedScript {
                path: script_path,
                arch: script.arch,
            });
        }
        Ok(scripts)
    }

    fn install_dlls(&self, files: &[PathBuf]) -> Result<Vec<InstalledDll>> {
        let mut installed = Vec::new();
        for path in artifacts_of(files, ArtifactKind::Library) {
            let dll_arch = classify::classify_dll(&self.tools.file, path)?;
            let directory = arch::destination_directory_name(self.target.arch, dll_arch)?;
            let target_path = files::install_file(path, &self.target.system_dir(directory))?;

            let name = files::file_name(path);
            println!("- {name} -> {}", style(directory).cyan());

            installed.push(InstalledDll {
                name,
                arch: dll_arch,
                directory,
                target_path,
            });
        }
        Ok(installed)
    }

    fn apply_scripts(&self, scripts: &[TranslatedScript]) -> Result<Vec<AppliedScript>> {
        let mut applied = Vec::new();
        for script in scripts {
            let variant = arch::helper_binary_variant(self.target.arch, script.arch)?;
            let program = variant.program(&self.tools.wine);
            let imported = regedit::import(&program, &self.target.root, &script.path);

            applied.push(AppliedScript {
                name: files::file_name(&script.path),
                variant,
                imported,
            });
        }
        Ok(applied)
    }
}
