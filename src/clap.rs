// =============================================================================
// Allo Starter Kit - Command Line Interface
// =============================================================================
//
// License: Apache 2.0 / MIT
//
// =============================================================================

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{debug, instrument};

/// Returns the current version of the crate with extra info if supplied
///
/// Set the environment variable `ALLO_VERSION_EXTRA` at build time to any
/// UTF-8 string to include it in parenthesis after the SemVer version.
pub fn version() -> String {
    let cargo_pkg_version = env!("CARGO_PKG_VERSION");

    match option_env!("ALLO_VERSION_EXTRA") {
        Some(x) => format!("{} ({})", cargo_pkg_version, x),
        None => cargo_pkg_version.to_owned(),
    }
}

/// Allo starter kit: profiles, metadata and MicroGrants pools on Allo v2
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[clap(about, version, name = "allo-starter")]
pub struct Args {
    /// Path to configuration file
    #[clap(short, long, env = "ALLO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[clap(short, long, global = true)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create an Allo profile and print its id
    CreateProfile {
        /// Profile nonce; random when omitted
        #[clap(long)]
        nonce: Option<u64>,

        /// Profile name; configured name when omitted
        #[clap(long)]
        name: Option<String>,
    },

    /// Create a profile, pin pool metadata and deploy a MicroGrants pool
    CreatePool {
        /// Profile nonce; random when omitted
        #[clap(long)]
        nonce: Option<u64>,

        /// Image to pin alongside the pool metadata
        #[clap(long)]
        image: Option<PathBuf>,
    },

    /// Print the current network gas price
    GasPrice,

    /// Print the profile id the registry will assign to a nonce and owner
    ProfileId {
        /// Profile nonce
        #[clap(long)]
        nonce: u64,

        /// Owner address; configured owner when omitted
        #[clap(long)]
        owner: Option<String>,
    },
}

/// Parse command line arguments
#[instrument(level = "debug")]
pub fn parse() -> Args {
    let start = Instant::now();
    let args = Args::parse();
    debug!("✅ Command line arguments parsed in {:?}", start.elapsed());
    args
}
