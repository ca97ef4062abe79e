//! recon-core: Shared types, target normalization, and error handling for recon.
//!
//! This crate provides the foundational types used by the enumeration engine:
//! - Port findings and per-target scan states
//! - The aggregated `Report` handed to report builders
//! - Domain normalization (input string → base domain)
//! - Port specifications passed to the scan capability
//! - Common error types

pub mod domain;
pub mod error;
pub mod ports;
pub mod types;

pub use domain::TargetDomain;
pub use error::ReconError;
pub use ports::PortSpec;
pub use types::{
    PortRecord, PortState, Report, ScanResults, TargetOutcome, TargetState, Transport,
};
