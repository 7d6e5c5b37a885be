//! Error types and handling for installcab
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every fallible step returns [`Result`]; only `main` decides to abort.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installcab operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallCabError {
    // Usage errors
    #[error("{message}")]
    #[diagnostic(
        code(installcab::usage),
        help("Pass the prefix as the third argument or export WINEPREFIX")
    )]
    Usage { message: String },

    // Target environment errors
    #[error("Could not determine wineprefix arch from {path}: {reason}")]
    #[diagnostic(
        code(installcab::prefix::unknown_arch),
        help("The prefix must contain a user.reg with an '#arch=win32' or '#arch=win64' line")
    )]
    UnknownTargetArchitecture { path: String, reason: String },

    // Architecture errors
    #[error("Unsupported processor architecture: {token}")]
    #[diagnostic(
        code(installcab::arch::unsupported),
        help("Supported architectures: amd64, x86, wow64")
    )]
    UnsupportedArchitecture { token: String },

    #[error("Architecture mismatch: {artifact} cannot be installed into a {target} prefix")]
    #[diagnostic(
        code(installcab::arch::mismatch),
        help("64-bit components need a 64-bit prefix (WINEARCH=win64)")
    )]
    ArchitectureMismatch { target: String, artifact: String },

    #[error("Manifest has no assemblyIdentity architecture: {path}")]
    #[diagnostic(code(installcab::manifest::missing_arch))]
    MissingArchitecture { path: String },

    #[error("Failed to parse manifest {path}: {reason}")]
    #[diagnostic(code(installcab::manifest::malformed))]
    MalformedManifest { path: String, reason: String },

    // External tool errors
    #[error("Failed to extract {archive}: {reason}")]
    #[diagnostic(
        code(installcab::extract::failed),
        help("Check that cabextract is installed and the archive is a valid cabinet")
    )]
    ExtractionFailed { archive: String, reason: String },

    #[error("Failed to determine architecture of {path}: {reason}")]
    #[diagnostic(
        code(installcab::classify::failed),
        help("Check that the 'file' utility is installed")
    )]
    ClassificationFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(installcab::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(installcab::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(installcab::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for InstallCabError {
    fn from(err: std::io::Error) -> Self {
        InstallCabError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, InstallCabError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = InstallCabError::UnsupportedArchitecture {
            token: "arm64".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("installcab::arch::unsupported".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InstallCabError = io_err.into();
        assert!(matches!(err, InstallCabError::IoError { .. }));
    }

    test_error_contains!(
        test_usage_error_is_message_only,
        InstallCabError::Usage {
            message: "You need to set WINEPREFIX for this to work!".to_string()
        },
        "WINEPREFIX"
    );

    test_error_contains!(
        test_architecture_mismatch_error,
        InstallCabError::ArchitectureMismatch {
            target: "win32".to_string(),
            artifact: "win64".to_string(),
        },
        "Architecture mismatch",
        "win64",
        "win32"
    );

    test_error_contains!(
        test_unknown_target_architecture_error,
        InstallCabError::UnknownTargetArchitecture {
            path: "/prefix/user.reg".to_string(),
            reason: "no #arch line".to_string(),
        },
        "wineprefix arch",
        "/prefix/user.reg"
    );

    test_error_contains!(
        test_extraction_failed_error,
        InstallCabError::ExtractionFailed {
            archive: "update.cab".to_string(),
            reason: "exit status 1".to_string(),
        },
        "Failed to extract",
        "update.cab"
    );

    test_error_contains!(
        test_missing_architecture_error,
        InstallCabError::MissingArchitecture {
            path: "foo.manifest".to_string(),
        },
        "assemblyIdentity",
        "foo.manifest"
    );
}
