//! Core domain types for recon.
//!
//! These types describe what a reconnaissance run found: open ports per
//! target, the terminal state each target reached, and the aggregated
//! `Report` that report builders consume.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ReconError, Result};

// ── Ports ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
    Sctp,
    Other(String),
}

impl Transport {
    pub fn parse(proto: &str) -> Self {
        match proto.to_lowercase().as_str() {
            "tcp" => Self::Tcp,
            "udp" => Self::Udp,
            "sctp" => Self::Sctp,
            _ => Self::Other(proto.to_string()),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Udp => f.write_str("udp"),
            Self::Sctp => f.write_str("sctp"),
            Self::Other(p) => f.write_str(p),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    Closed,
    Filtered,
}

impl PortState {
    /// Anything that is neither `open` nor `closed` (`filtered`,
    /// `open|filtered`, `unfiltered`, ...) counts as filtered.
    pub fn parse(state: &str) -> Self {
        match state.to_lowercase().as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Filtered,
        }
    }
}

/// One confirmed-open port on one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortRecord {
    pub port: u16,
    pub transport: Transport,
    pub service: String,
    /// `product version`, trimmed. Empty when the scanner reported neither.
    pub version: String,
}

impl PortRecord {
    pub fn new(
        port: u16,
        transport: Transport,
        service: &str,
        product: Option<&str>,
        version: Option<&str>,
    ) -> Self {
        let combined = format!("{} {}", product.unwrap_or(""), version.unwrap_or(""));
        Self {
            port,
            transport,
            service: service.to_string(),
            version: combined.trim().to_string(),
        }
    }
}

impl fmt::Display for PortRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} - {}", self.port, self.transport, self.service)?;
        if !self.version.is_empty() {
            write!(f, " ({})", self.version)?;
        }
        Ok(())
    }
}

// ── Target lifecycle ──────────────────────────────────────────────

/// Where a scan target is in its single pass through the orchestrator.
///
/// `Pending → Resolving → {ResolutionFailed | Resolved}`,
/// `Resolved → Scanning → {ScanFailed | Scanned}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetState {
    Pending,
    Resolving,
    ResolutionFailed,
    Resolved,
    Scanning,
    ScanFailed,
    Scanned,
}

impl TargetState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed | Self::ScanFailed | Self::Scanned
        )
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Resolving)
                | (Self::Resolving, Self::ResolutionFailed)
                | (Self::Resolving, Self::Resolved)
                | (Self::Resolved, Self::Scanning)
                | (Self::Scanning, Self::ScanFailed)
                | (Self::Scanning, Self::Scanned)
        )
    }

    /// Move to `next`, rejecting edges the lifecycle does not allow.
    pub fn advance(&mut self, next: Self) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(ReconError::IllegalTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Resolving => "RESOLVING",
            Self::ResolutionFailed => "RESOLUTION_FAILED",
            Self::Resolved => "RESOLVED",
            Self::Scanning => "SCANNING",
            Self::ScanFailed => "SCAN_FAILED",
            Self::Scanned => "SCANNED",
        };
        f.write_str(s)
    }
}

/// The terminal result of processing one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: String,
    pub ip: Option<IpAddr>,
    pub state: TargetState,
    /// Open ports, in the order the scanner reported them. Empty unless `Scanned`.
    pub ports: Vec<PortRecord>,
    pub error: Option<String>,
}

// ── Report ────────────────────────────────────────────────────────

/// Open ports per successfully scanned target.
pub type ScanResults = BTreeMap<String, Vec<PortRecord>>;

/// The aggregated result of one reconnaissance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Uuid,
    /// The host the operator asked for, normalized.
    pub target: String,
    pub base_domain: String,
    pub generated_at: DateTime<Utc>,
    pub subdomains: BTreeSet<String>,
    pub scan_results: ScanResults,
    pub outcomes: Vec<TargetOutcome>,
}

impl Report {
    /// Assemble a report; only `Scanned` outcomes contribute to `scan_results`.
    pub fn new(
        target: &str,
        base_domain: &str,
        subdomains: BTreeSet<String>,
        outcomes: Vec<TargetOutcome>,
    ) -> Self {
        let scan_results = outcomes
            .iter()
            .filter(|o| o.state == TargetState::Scanned)
            .map(|o| (o.target.clone(), o.ports.clone()))
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            target: target.to_string(),
            base_domain: base_domain.to_string(),
            generated_at: Utc::now(),
            subdomains,
            scan_results,
            outcomes,
        }
    }

    pub fn open_port_count(&self) -> usize {
        self.scan_results.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(target: &str, state: TargetState, ports: Vec<PortRecord>) -> TargetOutcome {
        TargetOutcome {
            target: target.to_string(),
            ip: None,
            state,
            ports,
            error: None,
        }
    }

    #[test]
    fn test_version_is_trimmed_concatenation() {
        let r = PortRecord::new(80, Transport::Tcp, "http", Some("nginx"), Some("1.18"));
        assert_eq!(r.version, "nginx 1.18");

        let r = PortRecord::new(22, Transport::Tcp, "ssh", Some("OpenSSH"), None);
        assert_eq!(r.version, "OpenSSH");

        let r = PortRecord::new(53, Transport::Udp, "domain", None, Some("9.18"));
        assert_eq!(r.version, "9.18");

        let r = PortRecord::new(25, Transport::Tcp, "smtp", None, None);
        assert_eq!(r.version, "");
    }

    #[test]
    fn test_port_record_display() {
        let r = PortRecord::new(80, Transport::Tcp, "http", Some("nginx"), Some("1.18"));
        assert_eq!(r.to_string(), "80/tcp - http (nginx 1.18)");

        let r = PortRecord::new(25, Transport::Tcp, "smtp", None, None);
        assert_eq!(r.to_string(), "25/tcp - smtp");
    }

    #[test]
    fn test_transport_and_state_parsing() {
        assert_eq!(Transport::parse("TCP"), Transport::Tcp);
        assert_eq!(Transport::parse("ip"), Transport::Other("ip".to_string()));
        assert_eq!(PortState::parse("open"), PortState::Open);
        assert_eq!(PortState::parse("closed"), PortState::Closed);
        assert_eq!(PortState::parse("open|filtered"), PortState::Filtered);
    }

    #[test]
    fn test_state_machine_edges() {
        let mut state = TargetState::Pending;
        state.advance(TargetState::Resolving).unwrap();
        state.advance(TargetState::Resolved).unwrap();
        state.advance(TargetState::Scanning).unwrap();
        state.advance(TargetState::Scanned).unwrap();
        assert!(state.is_terminal());

        // No way back out of a terminal state.
        assert!(state.advance(TargetState::Pending).is_err());
        assert!(!TargetState::Resolving.can_transition_to(TargetState::Scanning));
        assert!(!TargetState::ResolutionFailed.can_transition_to(TargetState::Resolving));
        assert!(!TargetState::Resolved.is_terminal());
    }

    #[test]
    fn test_report_only_keeps_scanned_targets() {
        let http = PortRecord::new(80, Transport::Tcp, "http", None, None);
        let report = Report::new(
            "example.com",
            "example.com",
            BTreeSet::new(),
            vec![
                outcome("www.example.com", TargetState::Scanned, vec![http.clone()]),
                outcome("mail.example.com", TargetState::ScanFailed, vec![]),
                outcome("ghost.example.com", TargetState::ResolutionFailed, vec![]),
                outcome("example.com", TargetState::Scanned, vec![]),
            ],
        );

        assert_eq!(report.scan_results.len(), 2);
        assert_eq!(report.scan_results["www.example.com"], vec![http]);
        assert!(report.scan_results["example.com"].is_empty());
        assert!(!report.scan_results.contains_key("mail.example.com"));
        assert!(!report.scan_results.contains_key("ghost.example.com"));
        assert_eq!(report.open_port_count(), 1);
    }
}
