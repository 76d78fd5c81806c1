// Host tooling crate — unwrap/expect/panic acceptable in non-library code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! buildgen — build-configuration bootstrap for the FreeRTOS simulation tree.
//!
//! Reads `configurations.yaml` from the working directory, validates the
//! configured paths, discovers the ARM cross-compiler prefix, and writes
//! the generated CMake/cmd variable files plus the BUILD/CLEAN entry
//! scripts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use buildgen::{clean_tree, Generator, Platform, Report};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "buildgen")]
#[command(about = "FreeRTOS simulation build-configuration bootstrap", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configurations.yaml and write the generated build files
    Generate {
        /// Configuration file to read
        #[arg(long, default_value = buildgen::DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Platform conventions for the emitted artifacts (defaults to the host)
        #[arg(long, value_enum)]
        platform: Option<PlatformArg>,
    },
    /// Remove the build, binary, and generated output directories
    Clean,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Posix,
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Posix => Platform::Posix,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { config, platform } => {
            let platform = platform.map_or_else(Platform::host, Platform::from);
            generate(&config, platform)
        }
        Commands::Clean => clean(),
    }
}

fn generate(config: &Path, platform: Platform) -> Result<()> {
    println!();
    println!(
        "{}",
        format!("Generating build configuration from {}...", config.display())
            .cyan()
            .bold()
    );
    println!();

    let start = Instant::now();
    let cwd = std::env::current_dir()?;

    let report = match Generator::new(&cwd, platform).run(config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", format!("✗ {e}").red().bold());
            anyhow::bail!("generation failed");
        }
    };

    print_report(&report);
    println!(
        "{}",
        format!("✓ Generation complete in {:.2}s", start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "  {}",
        format!("{} configuration entries validated", report.entries).green()
    );
    match &report.prefix {
        Some(prefix) => println!("  {}", format!("compiler prefix: {prefix}").green()),
        None => println!(
            "  {}",
            "no cross compiler found; EABI_PREFIX not emitted".yellow()
        ),
    }
    for tool in &report.missing_tools {
        println!(
            "  {}",
            format!("toolchain is missing {tool} (builds may fail later)").yellow()
        );
    }
    for path in &report.written {
        println!("  {}", format!("wrote {}", path.display()).dimmed());
    }
    println!();
}

fn clean() -> Result<()> {
    println!();
    println!("{}", "Cleaning build outputs...".cyan().bold());
    println!();

    let cwd = std::env::current_dir()?;
    let removed = match clean_tree(&cwd) {
        Ok(removed) => removed,
        Err(e) => {
            eprintln!("{}", format!("✗ {e}").red().bold());
            anyhow::bail!("clean failed");
        }
    };

    if removed.is_empty() {
        println!("  {}", "nothing to remove".dimmed());
    } else {
        for path in &removed {
            println!("  {}", format!("removed {}", path.display()).dimmed());
        }
    }
    println!();
    println!("{}", "✓ Clean complete".green().bold());
    println!();
    Ok(())
}
