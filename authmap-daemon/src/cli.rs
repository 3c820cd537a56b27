//! CLI argument definitions for authmap-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Authmap SSH authentication monitoring daemon.
///
/// Tails the system auth log, classifies sshd events, geolocates the
/// source address, and emits metric points to InfluxDB.
#[derive(Parser, Debug)]
#[command(name = "authmap-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to authmap.toml configuration file.
    ///
    /// If the file does not exist, a default configuration is written
    /// there on first start.
    #[arg(short, long, default_value = "/etc/authmap/authmap.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}
