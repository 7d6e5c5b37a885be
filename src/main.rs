//! installcab - install components from Windows update cabinets into a Wine prefix
//!
//! Extracts a named component from a cabinet, turns the registry keys of its
//! SxS manifests into `.reg` scripts, copies its DLLs into the right system
//! directory of a mixed 32/64-bit prefix and imports the scripts with `wine regedit`.

use clap::{CommandFactory, Parser};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

mod arch;
mod cli;
mod error;
mod installer;
mod manifest;
mod prefix;
mod progress;
mod regscript;
mod temp;
mod tools;

use cli::Cli;
use error::Result;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // Only fails when a logger is already installed.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn run(cli: &Cli, archive: &std::path::Path, component: &str) -> Result<()> {
    let prefix = cli.prefix()?;
    let report = installer::run(prefix, cli.toolchain(), archive, component)?;

    for dll in &report.dlls {
        log::debug!(
            "{} ({}) installed to {}",
            dll.name,
            dll.arch,
            dll.target_path.display()
        );
    }
    for script in &report.scripts {
        log::debug!("{} applied with {:?} helper", script.name, script.variant);
    }

    let failed = report.scripts.iter().filter(|s| !s.imported).count();
    if failed > 0 {
        log::warn!("{failed} registry script(s) may not have been imported");
    }
    log::info!(
        "installed {} DLL(s) and {} registry script(s)",
        report.dlls.len(),
        report.scripts.len()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some((archive, component)) = cli.request() else {
        // Not enough arguments: treat as a help request.
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    if let Err(e) = run(&cli, archive, component) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
