//! Configuration for a reconnaissance run.

use serde::Deserialize;

use recon_core::PortSpec;

use crate::error::Result;

/// Top-level recon configuration.
///
/// Loaded from the `[recon]` section of `recon.toml` or `RECON__`
/// environment variables; CLI flags override both.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    /// Path to the nmap binary (default: "nmap").
    #[serde(default = "default_nmap_path")]
    pub nmap_path: String,

    /// Timing and detection flags passed to nmap ahead of the port list.
    #[serde(default = "default_nmap_args")]
    pub nmap_args: Vec<String>,

    /// Value for nmap's `--host-timeout` (e.g. "5m"). Unset means no limit.
    #[serde(default)]
    pub host_timeout: Option<String>,

    /// Ports to scan on every target.
    #[serde(default)]
    pub ports: PortSpec,

    /// Number of DNS lookups in flight during brute force.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Number of targets scanned at once. 1 scans sequentially.
    #[serde(default = "default_scan_concurrency")]
    pub scan_concurrency: usize,

    /// Per-lookup DNS timeout in seconds.
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout_secs: u64,

    /// Wordlist file; the built-in list is used when unset.
    #[serde(default)]
    pub wordlist: Option<String>,

    #[serde(default)]
    pub format: ReportFormat,
}

/// Output format for the persisted report.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

fn default_nmap_path() -> String {
    "nmap".to_string()
}

fn default_nmap_args() -> Vec<String> {
    vec!["-T4".to_string(), "-sV".to_string()]
}

fn default_threads() -> usize {
    10
}

fn default_scan_concurrency() -> usize {
    1
}

fn default_dns_timeout() -> u64 {
    5
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            nmap_path: default_nmap_path(),
            nmap_args: default_nmap_args(),
            host_timeout: None,
            ports: PortSpec::default(),
            threads: default_threads(),
            scan_concurrency: default_scan_concurrency(),
            dns_timeout_secs: default_dns_timeout(),
            wordlist: None,
            format: ReportFormat::default(),
        }
    }
}

/// Load the `[recon]` section from `<file_prefix>.toml` and the environment.
///
/// A missing file or section yields the defaults; a section that is present
/// but malformed is an error.
pub fn load_config(file_prefix: &str) -> Result<ReconConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("RECON")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<ReconConfig>("recon") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(ReconConfig::default()),
        Err(e) => Err(e.into()),
    }
}
