//! Error types for the recon-discover crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Nmap not found at path: {path}")]
    NmapNotFound { path: String },

    #[error("Failed to initialize DNS resolver: {0}")]
    ResolverInit(String),

    #[error("DNS lookup for {name} failed: {reason}")]
    Resolve { name: String, reason: String },

    #[error("Nmap exited with code {code}: {stderr}")]
    NmapFailed { code: i32, stderr: String },

    #[error("Failed to parse nmap XML output: {0}")]
    XmlParse(String),

    #[error("Host {addr} did not respond to the scan")]
    HostUnreachable { addr: String },

    #[error("Scan interrupted by user")]
    Interrupted,

    #[error(transparent)]
    Core(#[from] recon_core::ReconError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DiscoverError {
    /// Process exit code for an error that ends the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }

    /// The scan capability failed for one target.
    pub fn is_scan_failure(&self) -> bool {
        matches!(
            self,
            Self::NmapFailed { .. } | Self::XmlParse(_) | Self::HostUnreachable { .. }
        )
    }

    /// A required external capability is missing; nothing was enumerated.
    pub fn is_dependency_missing(&self) -> bool {
        matches!(self, Self::NmapNotFound { .. } | Self::ResolverInit(_))
    }
}

impl From<config::ConfigError> for DiscoverError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DiscoverError>;
