//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::error::{InstallCabError, Result};
use crate::tools::Toolchain;

/// installcab - install components from Windows update cabinets into a Wine prefix
///
/// Extracts every file of a component, copies its DLLs into the system directory
/// matching their bitness and imports the registry keys from its manifests.
#[derive(Parser, Debug)]
#[command(
    name = "installcab",
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install components from Windows update cabinets into a Wine prefix",
    after_help = "Examples:\n    \
                  installcab ~/.cache/winetricks/win7sp1/windows6.1-KB976932-X86.exe \
                  x86_microsoft-windows-mediafoundation\n    \
                  installcab update.cab amd64_microsoft-windows-mfplat ~/.wine64 /opt/wine/bin/wine"
)]
pub struct Cli {
    /// Cabinet or self-extracting update to read from
    #[arg(value_name = "CABFILE")]
    pub archive: Option<PathBuf>,

    /// Component name; every file whose name contains it is extracted
    #[arg(value_name = "COMPONENT")]
    pub component: Option<String>,

    /// Wine prefix to install into
    #[arg(value_name = "WINEPREFIX", env = "WINEPREFIX")]
    pub prefix: Option<PathBuf>,

    /// Wine binary used to import registry scripts; 64-bit scripts use "<WINE>64"
    #[arg(value_name = "WINE", default_value = "wine")]
    pub wine: String,

    /// Enable verbose output (repeat for more)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Program used to extract files from the cabinet
    #[arg(long, value_name = "PROGRAM", env = "INSTALLCAB_CABEXTRACT", default_value = "cabextract")]
    pub cabextract: String,

    /// Program used to detect DLL bitness
    #[arg(long = "file-command", value_name = "PROGRAM", env = "INSTALLCAB_FILE", default_value = "file")]
    pub file_command: String,
}

impl Cli {
    /// Archive and component, or `None` when this is a help request
    pub fn request(&self) -> Option<(&PathBuf, &str)> {
        match (&self.archive, &self.component) {
            (Some(archive), Some(component)) => Some((archive, component.as_str())),
            _ => None,
        }
    }

    /// Prefix from the argument or `WINEPREFIX`
    pub fn prefix(&self) -> Result<&PathBuf> {
        self.prefix.as_ref().ok_or_else(|| InstallCabError::Usage {
            message: "You need to set WINEPREFIX for this to work!".to_string(),
        })
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            cabextract: self.cabextract.clone(),
            file: self.file_command.clone(),
            wine: self.wine.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn without_env<T>(vars: &[&str], f: impl FnOnce() -> T) -> T {
        let saved: Vec<_> = vars.iter().map(|v| (*v, std::env::var_os(v))).collect();
        unsafe {
            for var in vars {
                std::env::remove_var(var);
            }
        }
        let result = f();
        unsafe {
            for (var, value) in saved {
                if let Some(value) = value {
                    std::env::set_var(var, value);
                }
            }
        }
        result
    }

    const TOOL_VARS: &[&str] = &["WINEPREFIX", "INSTALLCAB_CABEXTRACT", "INSTALLCAB_FILE"];

    #[test]
    #[serial]
    fn test_cli_no_arguments_is_help_request() {
        let cli = without_env(TOOL_VARS, || Cli::try_parse_from(["installcab"]).unwrap());
        assert!(cli.request().is_none());
    }

    #[test]
    #[serial]
    fn test_cli_one_argument_is_help_request() {
        let cli = without_env(TOOL_VARS, || {
            Cli::try_parse_from(["installcab", "update.cab"]).unwrap()
        });
        assert!(cli.request().is_none());
    }

    #[test]
    #[serial]
    fn test_cli_all_positionals() {
        let cli = without_env(TOOL_VARS, || {
            Cli::try_parse_from([
                "installcab",
                "update.cab",
                "x86_microsoft-windows-mediafoundation",
                "/tmp/prefix",
                "/opt/wine/bin/wine",
            ])
            .unwrap()
        });
        let (archive, component) = cli.request().unwrap();
        assert_eq!(archive, &PathBuf::from("update.cab"));
        assert_eq!(component, "x86_microsoft-windows-mediafoundation");
        assert_eq!(cli.prefix().unwrap(), &PathBuf::from("/tmp/prefix"));
        assert_eq!(cli.toolchain().wine, "/opt/wine/bin/wine");
        assert_eq!(cli.toolchain().cabextract, "cabextract");
        assert_eq!(cli.toolchain().file, "file");
    }

    #[test]
    #[serial]
    fn test_cli_missing_prefix_is_usage_error() {
        let cli = without_env(TOOL_VARS, || {
            Cli::try_parse_from(["installcab", "update.cab", "component"]).unwrap()
        });
        assert_eq!(cli.wine, "wine");
        assert!(matches!(
            cli.prefix().unwrap_err(),
            InstallCabError::Usage { .. }
        ));
    }

    #[test]
    #[serial]
    fn test_cli_prefix_from_env() {
        let original = std::env::var_os("WINEPREFIX");
        unsafe {
            std::env::set_var("WINEPREFIX", "/tmp/env-prefix");
        }
        let cli = Cli::try_parse_from(["installcab", "update.cab", "component"]).unwrap();
        assert_eq!(cli.prefix().unwrap(), &PathBuf::from("/tmp/env-prefix"));

        let cli =
            Cli::try_parse_from(["installcab", "update.cab", "component", "/tmp/arg-prefix"]).unwrap();
        assert_eq!(cli.prefix().unwrap(), &PathBuf::from("/tmp/arg-prefix"));

        unsafe {
            match original {
                Some(value) => std::env::set_var("WINEPREFIX", value),
                None => std::env::remove_var("WINEPREFIX"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_cli_tool_overrides_and_verbosity() {
        let cli = without_env(TOOL_VARS, || {
            Cli::try_parse_from([
                "installcab",
                "-vv",
                "--cabextract",
                "/usr/local/bin/cabextract",
                "--file-command",
                "/usr/bin/file",
                "update.cab",
                "component",
                "/tmp/prefix",
            ])
            .unwrap()
        });
        assert_eq!(cli.verbose, 2);
        let tools = cli.toolchain();
        assert_eq!(tools.cabextract, "/usr/local/bin/cabextract");
        assert_eq!(tools.file, "/usr/bin/file");
    }
}
