//! recon-discover: Subdomain brute force and port enumeration for a single domain.
//!
//! Resolves a wordlist of candidate names against the target's base domain
//! with a bounded worker pool, then runs nmap service detection against every
//! live name, isolating failures per target, and renders the aggregated report.

pub mod config;
pub mod error;
pub mod nmap_xml;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod targets;
pub mod wordlist;
