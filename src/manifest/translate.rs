//! Manifest to registry script translation

use super::Manifest;
use crate::arch::{self, Arch, TargetArch};
use crate::error::{InstallCabError, Result};
use crate::regscript::RegistryScript;

const CLASSES_ROOT: &str = "HKEY_CLASSES_ROOT";
const CLASSES_ROOT_EXPANDED: &str = "HKEY_LOCAL_MACHINE\\Software\\Classes";

/// Translate a manifest into a registry script for a prefix of `target` arch
///
/// The script carries the manifest's own architecture, which later selects
/// the import helper.
pub fn translate(manifest: &Manifest, target: TargetArch) -> Result<RegistryScript> {
    let token = manifest
        .arch_token
        .as_deref()
        .ok_or_else(|| InstallCabError::MissingArchitecture {
            path: manifest.source.clone(),
        })?;
    let manifest_arch = Arch::normalize(token)?;
    arch::validate_against_target(manifest_arch, target)?;

    let system32 = runtime_system32(manifest_arch)?;
    let mut script = RegistryScript::new(manifest_arch);

    for key in manifest.registry_keys.iter().flatten() {
        script.push_section(normalize_key(&key.key_name));
        for value in &key.values {
            if let Some(encoded) = value.encoded_value(&system32) {
                script.push_value(value.encoded_name(), encoded);
            }
        }
    }

    Ok(script)
}

/// `$(runtime.system32)` as seen from the manifest's own architecture
fn runtime_system32(manifest_arch: Arch) -> Result<String> {
    let dir = arch::destination_directory_name(manifest_arch.native_target(), manifest_arch)?;
    Ok(format!("C:\\windows\\{dir}"))
}

/// Strip surrounding separators and expand the classes root alias
pub fn normalize_key(key_name: &str) -> String {
    let key = key_name.trim_matches('\\');
    match key.strip_prefix(CLASSES_ROOT) {
        Some(rest) => format!("{CLASSES_ROOT_EXPANDED}{rest}"),
        None => key.to_string(),
    }
}
