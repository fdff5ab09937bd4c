//! Command line arguments and logging setup.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// MD5 digests of every regular file under a directory.
#[derive(Parser, Debug)]
#[command(name = "flowline-md5tree")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Root directory to walk.
    pub root: PathBuf,

    /// Number of concurrent hashing workers.
    #[arg(long, default_value_t = 64)]
    pub spread: usize,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`. Logs go to
/// stderr so stdout carries only digests.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
