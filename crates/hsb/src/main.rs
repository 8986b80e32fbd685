//! HSB CLI - compiles `.hsb` sources into static HTML pages.
//!
//! `hsb <INPUT>` compiles one file, or every source file under a directory,
//! into the output directory.

mod build;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use build::BuildArgs;
use output::Output;

/// HSB - hybrid source builder for static HTML sites.
#[derive(Parser)]
#[command(name = "hsb", version, about)]
struct Cli {
    /// Source file or directory to compile.
    input: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Template folder (overrides config; default: ./templates).
    #[arg(long, value_name = "PATH")]
    template_dir: Option<PathBuf>,

    /// Output folder (overrides config; default: ./output).
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover hsb.toml).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level plus per-directive DEBUG from the compiler,
    // otherwise use RUST_LOG or default to WARN
    let filter = log_filter(cli.verbose, std::env::var("RUST_LOG").ok().as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = BuildArgs {
        input: cli.input,
        template_dir: cli.template_dir,
        output_dir: cli.output_dir,
        config: cli.config,
        verbose: cli.verbose,
    };

    match args.execute(&output) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info,hsb_compiler=debug,hsb_build=debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
