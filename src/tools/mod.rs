//! External programs installcab drives
//!
//! This module handles:
//! - Extracting matching files from a cabinet (`cabextract`)
//! - Sniffing DLL bitness (`file`)
//! - Importing registry scripts (`wine regedit`)
//!
//! All invocations are blocking and strictly sequential.

pub mod cabextract;
pub mod classify;
pub mod regedit;

/// Program names for each external collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub cabextract: String,
    pub file: String,
    /// Base name of the registry import helper; the 64-bit variant appends `64`
    pub wine: String,
}

/// Human-readable rendering of a command line for diagnostics
fn describe(program: &str, args: &[&std::ffi::OsStr]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
