//! Registry script (`.reg`) model
//!
//! Sections and values keep insertion order so the rendered script follows
//! the manifest it came from.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::arch::Arch;
use crate::error::{InstallCabError, Result};

/// Format version line understood by `regedit`
pub const HEADER: &str = "Windows Registry Editor Version 5.00";

/// One `[key]` block and its `name=value` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub values: Vec<(String, String)>,
}

/// Ordered registry script bound to the architecture it was written for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryScript {
    pub arch: Arch,
    pub sections: Vec<Section>,
}

impl RegistryScript {
    pub fn new(arch: Arch) -> Self {
        Self {
            arch,
            sections: Vec::new(),
        }
    }

    /// Start a new section; subsequent values go into it
    pub fn push_section(&mut self, key: impl Into<String>) {
        self.sections.push(Section {
            key: key.into(),
            values: Vec::new(),
        });
    }

    /// Append a value line to the most recent section
    pub fn push_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(section) = self.sections.last_mut() {
            section.values.push((name.into(), value.into()));
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string()).map_err(|e| InstallCabError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for RegistryScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        writeln!(f)?;
        for section in &self.sections {
            writeln!(f, "[{}]", section.key)?;
            for (name, value) in &section.values {
                writeln!(f, "{name}={value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
