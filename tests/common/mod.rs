//! Common test utilities for installcab integration tests
//!
//! The external programs are replaced by small shell scripts:
//! - `cabextract` copies a payload directory into `-d`
//! - `file` reports x86-64 for DLLs whose name ends in `64.dll`
//! - `wine`/`wine64` record their invocation and the script they were given

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A prefix plus stand-in tools in a temporary directory
pub struct TestPrefix {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to the Wine prefix
    pub prefix: PathBuf,
    /// Files the fake cabextract "extracts"
    pub payload: PathBuf,
    /// Directory holding the fake tools
    pub bin: PathBuf,
    /// Invocations recorded by the fake wine
    pub log: PathBuf,
}

impl TestPrefix {
    /// Create a prefix whose user.reg declares `arch`
    pub fn new(arch: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let prefix = temp.path().join("prefix");
        let payload = temp.path().join("payload");
        let bin = temp.path().join("bin");
        let log = temp.path().join("wine.log");
        for dir in [&prefix, &payload, &bin] {
            fs::create_dir_all(dir).expect("Failed to create directory");
        }
        fs::write(
            prefix.join("user.reg"),
            format!("WINE REGISTRY Version 2\n;; All keys relative to \\User\n\n#arch={arch}\n"),
        )
        .expect("Failed to write user.reg");

        let test_prefix = Self {
            temp,
            prefix,
            payload,
            bin,
            log,
        };
        test_prefix.install_tools();
        test_prefix
    }

    fn write_tool(&self, name: &str, body: &str) {
        let path = self.bin.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make tool executable");
    }

    fn install_tools(&self) {
        self.write_tool(
            "cabextract",
            &format!("cp -R \"{}/.\" \"$4\"", self.payload.display()),
        );
        self.write_tool(
            "file",
            "case \"$(basename \"$2\")\" in\n\
             *64.dll) echo 'PE32+ executable (DLL) (GUI) x86-64, for MS Windows' ;;\n\
             *) echo 'PE32 executable (DLL) (GUI) Intel 80386, for MS Windows' ;;\n\
             esac",
        );
        let record = format!(
            "echo \"$(basename \"$0\") $1 $WINEPREFIX\" >> \"{log}\"\ncat \"$2\" >> \"{log}\"",
            log = self.log.display()
        );
        self.write_tool("wine", &record);
        self.write_tool("wine64", &record);
    }

    /// Replace a stand-in tool with a failing one
    pub fn break_tool(&self, name: &str) {
        self.write_tool(name, "echo \"broken $0\" >&2\nexit 3");
    }

    /// Add a file to the extracted payload
    pub fn add_payload(&self, name: &str, content: &str) {
        let path = self.payload.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(path, content).expect("Failed to write payload file");
    }

    /// Path to a file inside the prefix
    pub fn prefix_path(&self, path: &str) -> PathBuf {
        self.prefix.join(path)
    }

    /// What the fake wine recorded, empty if it never ran
    pub fn wine_log(&self) -> String {
        fs::read_to_string(&self.log).unwrap_or_default()
    }

    pub fn archive(&self) -> PathBuf {
        self.temp.path().join("windows6.1-KB976932-X64.cab")
    }

    /// installcab wired to the stand-in tools, with no inherited WINEPREFIX
    pub fn cmd(&self) -> Command {
        let mut cmd = installcab_cmd();
        cmd.env_remove("WINEPREFIX")
            .env("INSTALLCAB_CABEXTRACT", self.bin.join("cabextract"))
            .env("INSTALLCAB_FILE", self.bin.join("file"));
        cmd
    }

    /// Arguments for a full install of `component`
    pub fn install_args(&self, component: &str) -> Vec<String> {
        vec![
            self.archive().display().to_string(),
            component.to_string(),
            self.prefix.display().to_string(),
            self.bin.join("wine").display().to_string(),
        ]
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn installcab_cmd() -> Command {
    Command::cargo_bin("installcab").expect("Failed to find installcab binary")
}

/// A minimal SxS manifest with one registry key
pub fn manifest(arch: &str, key: &str, values: &[(&str, &str, &str)]) -> String {
    let mut values_xml = String::new();
    for (name, value_type, value) in values {
        values_xml.push_str(&format!(
            "      <registryValue name=\"{name}\" valueType=\"{value_type}\" value=\"{value}\" />\n"
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n\
         <assembly xmlns=\"urn:schemas-microsoft-com:asm.v3\" manifestVersion=\"1.0\">\n  \
         <assemblyIdentity name=\"Test\" version=\"6.1.7601.17514\" processorArchitecture=\"{arch}\" />\n  \
         <registryKeys>\n    \
         <registryKey keyName=\"{key}\">\n{values_xml}    </registryKey>\n  \
         </registryKeys>\n\
         </assembly>\n"
    )
}
