//! `dll-bundle <exe> <output-dir>`: copy the DLLs a Windows binary needs.

use anyhow::{Context, Result};
use clap::Parser;
use colored::{Color, Colorize};
use log::Level;
use std::io;
use std::path::PathBuf;

use dll_bundle::{BundleConfig, Bundler, Objdump, DEFAULT_OBJDUMP, DEFAULT_SEARCH_PATH};

/// Gather the transitive DLL dependencies of a MinGW-built binary.
#[derive(Debug, Parser)]
#[command(name = "dll-bundle", version, about)]
struct Cli {
    /// Executable (or DLL) whose dependencies are bundled
    exe_path: PathBuf,

    /// Directory receiving the libraries, created if missing
    output_dir: PathBuf,

    /// Directory holding the toolchain's DLLs
    #[arg(long, env = "DLL_BUNDLE_SEARCH_PATH", default_value = DEFAULT_SEARCH_PATH)]
    search_path: PathBuf,

    /// objdump binary able to read PE files
    #[arg(long, env = "DLL_BUNDLE_OBJDUMP", default_value = DEFAULT_OBJDUMP)]
    objdump: String,

    /// Extra library to bundle even if no import table names it (repeatable)
    #[arg(long = "force-include", value_name = "NAME")]
    force_include: Vec<String>,

    /// Do not force-include the default MinGW runtime libraries
    #[arg(long)]
    no_default_force_include: bool,

    /// Sets the log level
    #[arg(
        long,
        env = "LOG_LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

fn init_logging(level: log::LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let color = match record.level() {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Blue,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Green,
            };
            out.finish(format_args!(
                "{} {}",
                format!("{}:", record.level().to_string().to_lowercase()).color(color),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("Failed to initialize logging")
}

fn run(cli: Cli) -> Result<()> {
    let level = cli
        .log_level
        .parse::<log::LevelFilter>()
        .with_context(|| format!("Invalid log level: {}", cli.log_level))?;
    init_logging(level)?;

    let mut force_include = if cli.no_default_force_include {
        Vec::new()
    } else {
        BundleConfig::default().force_include
    };
    force_include.extend(cli.force_include);

    let config = BundleConfig::default()
        .with_search_path(cli.search_path)
        .with_force_include(force_include);
    let bundler = Bundler::new(config, Objdump::with_tool(cli.objdump));
    log::debug!(
        "Resolving libraries against {}",
        bundler.config().search_path.display()
    );

    let report = bundler.gather(&cli.exe_path, &cli.output_dir)?;

    log::info!(
        "Bundled {} libraries into {} ({} already present, {} missing)",
        report.copied.len(),
        cli.output_dir.display(),
        report.already_present.len(),
        report.missing.len()
    );
    if !report.is_complete() {
        log::warn!("Bundle may be incomplete, review the warnings above");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red(), e);
        std::process::exit(1);
    }
}
