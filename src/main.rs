//! papercache - Content-addressed analysis cache maintenance tool
//!
//! Inspects, sweeps, and clears a cache directory of analysis entries, and
//! prints content fingerprints for individual files. The cache itself is
//! consumed as a library by the analysis pipeline; this binary covers the
//! operational side.

use clap::Parser;
use papercache::cache::{clear_cache, AnalysisCache};
use papercache::cli::{Action, Cli};
use papercache::fingerprint::content_fingerprint_for_file;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let cli = Cli::parse();
    let (config, action) = match cli.into_parts() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match action {
        Action::Fingerprint(path) => {
            // Never fails; falls back to metadata-derived keys
            println!("{}", content_fingerprint_for_file(&path));
            ExitCode::SUCCESS
        }
        Action::Clear => match clear_cache(&config) {
            Ok(()) => {
                eprintln!("Cache cleared: {}", config.cache_dir.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },
        Action::Sweep => {
            let cache = match AnalysisCache::new(config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };
            match cache.sweep() {
                Ok(stats) => {
                    eprintln!(
                        "Sweep complete: examined {} entries, removed {}",
                        stats.examined, stats.removed
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
        Action::Stats => {
            let cache = match AnalysisCache::new(config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };
            match cache.stats() {
                Ok(stats) => {
                    println!("Cache directory: {}", cache.config().cache_dir.display());
                    println!("Total entries:   {}", stats.total);
                    println!("  valid:         {}", stats.valid);
                    println!("  stale:         {}", stats.stale);
                    println!("  quarantined:   {}", stats.quarantined);
                    println!("  corrupt:       {}", stats.corrupt);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }
    }
}
