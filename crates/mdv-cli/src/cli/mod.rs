//! CLI for the mdv manifest verifier.

mod report;

use anyhow::Result;
use clap::Parser;
use mdv_core::config;
use mdv_core::hasher::Md5Hasher;
use mdv_core::manifest;
use mdv_core::verify;
use std::path::PathBuf;

use report::ConsoleReporter;

/// Verify files against an `.md5` checksum list.
#[derive(Debug, Parser)]
#[command(name = "mdv", version)]
#[command(about = "Verify files against an .md5 checksum list", long_about = None)]
pub struct Cli {
    /// Path to an .md5 file, or a directory containing one (directly or in
    /// an md5/ subfolder).
    pub path: PathBuf,

    /// Hashing chunk size in bytes (default: sized from available memory).
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<u64>,

    /// Exit nonzero if any entry fails, is missing, or cannot be read.
    #[arg(long)]
    pub strict: bool,
}

/// Parse arguments, run verification, and return the process exit code.
///
/// A completed run exits 0 regardless of per-entry results unless strict
/// mode is on (flag or config); failure to locate or read the manifest is
/// an error.
pub fn run_from_args() -> Result<i32> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let manifest_path = manifest::find_manifest(&cli.path)?;
    let mut hasher = Md5Hasher {
        chunk_size: cli.chunk_size.or(cfg.chunk_size_bytes),
    };
    let mut reporter = ConsoleReporter::new();
    let summary = verify::verify_manifest(&manifest_path, &mut hasher, &mut reporter)?;

    if (cli.strict || cfg.strict_exit) && !summary.all_ok() {
        return Ok(1);
    }
    Ok(0)
}
