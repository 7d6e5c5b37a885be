//! Architecture resolution for mixed-bitness prefixes
//!
//! A 64-bit prefix hosts both `system32` (64-bit) and `syswow64` (32-bit).
//! Every artifact is routed by its own bitness and the prefix's, and
//! impossible combinations fail instead of guessing.

use std::fmt;

use crate::error::{InstallCabError, Result};

/// Architecture of an extracted artifact or manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Win32,
    Win64,
    /// 32-bit component shipped for the 64-bit compatibility layer
    Wow64,
}

impl Arch {
    /// Map a `processorArchitecture` token to an architecture
    pub fn normalize(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "amd64" => Ok(Arch::Win64),
            "x86" => Ok(Arch::Win32),
            "wow64" => Ok(Arch::Wow64),
            _ => Err(InstallCabError::UnsupportedArchitecture {
                token: token.to_string(),
            }),
        }
    }

    pub fn requires_64bit(self) -> bool {
        matches!(self, Arch::Win64 | Arch::Wow64)
    }

    /// The prefix this artifact would consider its own
    pub fn native_target(self) -> TargetArch {
        if self.requires_64bit() {
            TargetArch::Win64
        } else {
            TargetArch::Win32
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::Win32 => write!(f, "win32"),
            Arch::Win64 => write!(f, "win64"),
            Arch::Wow64 => write!(f, "wow64"),
        }
    }
}

/// Architecture of the prefix itself; `wow64` is never a prefix arch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetArch {
    Win32,
    Win64,
}

impl TargetArch {
    /// Parse the value of an `#arch=` marker
    pub fn from_marker(value: &str) -> Option<Self> {
        match value {
            "win32" => Some(TargetArch::Win32),
            "win64" => Some(TargetArch::Win64),
            _ => None,
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetArch::Win32 => write!(f, "win32"),
            TargetArch::Win64 => write!(f, "win64"),
        }
    }
}

/// Which registry import helper applies a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperVariant {
    ThirtyTwo,
    SixtyFour,
}

impl HelperVariant {
    /// Program name for this variant given the helper base name (`wine` -> `wine64`)
    pub fn program(self, base: &str) -> String {
        match self {
            HelperVariant::ThirtyTwo => base.to_string(),
            HelperVariant::SixtyFour => format!("{base}64"),
        }
    }
}

fn mismatch(target: TargetArch, artifact: Arch) -> InstallCabError {
    InstallCabError::ArchitectureMismatch {
        target: target.to_string(),
        artifact: artifact.to_string(),
    }
}

/// Fail if `resolved` needs 64-bit support the prefix does not have
pub fn validate_against_target(resolved: Arch, target: TargetArch) -> Result<()> {
    if resolved.requires_64bit() && target == TargetArch::Win32 {
        return Err(mismatch(target, resolved));
    }
    Ok(())
}

/// System directory a DLL of `artifact` arch lands in
pub fn destination_directory_name(target: TargetArch, artifact: Arch) -> Result<&'static str> {
    match (target, artifact) {
        (TargetArch::Win32, Arch::Win32) => Ok("System32"),
        (TargetArch::Win32, Arch::Win64 | Arch::Wow64) => Err(mismatch(target, artifact)),
        (TargetArch::Win64, Arch::Win32) => Ok("Syswow64"),
        (TargetArch::Win64, Arch::Win64 | Arch::Wow64) => Ok("System32"),
    }
}

/// Helper variant that must apply a registry script written for `artifact`
pub fn helper_binary_variant(target: TargetArch, artifact: Arch) -> Result<HelperVariant> {
    validate_against_target(artifact, target)?;
    Ok(if artifact.requires_64bit() {
        HelperVariant::SixtyFour
    } else {
        HelperVariant::ThirtyTwo
    })
}
