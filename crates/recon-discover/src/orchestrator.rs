//! Per-target port scan orchestration.
//!
//! Every target gets exactly one pass: resolve to an IPv4 address, scan it,
//! keep the open ports. A failure at either step ends that target's pass and
//! is recorded in its `TargetOutcome`; the remaining targets are unaffected.

use std::net::IpAddr;

use futures::stream::{self, StreamExt};

use recon_core::{PortRecord, PortSpec, PortState, TargetOutcome, TargetState, Transport};

use crate::error::{DiscoverError, Result};
use crate::resolver::NameResolver;
use crate::scanner::{PortScanner, RawPortEntry};

pub struct Orchestrator<R, S> {
    resolver: R,
    scanner: S,
    ports: PortSpec,
    concurrency: usize,
}

impl<R: NameResolver, S: PortScanner> Orchestrator<R, S> {
    /// `concurrency` is the number of targets in progress at once; 0 is treated as 1.
    pub fn new(resolver: R, scanner: S, ports: PortSpec, concurrency: usize) -> Self {
        Self {
            resolver,
            scanner,
            ports,
            concurrency: concurrency.max(1),
        }
    }

    /// Process every target. Outcomes come back in target order.
    pub async fn run(&self, targets: &[String]) -> Vec<TargetOutcome> {
        tracing::info!(
            targets = targets.len(),
            ports = %self.ports,
            concurrency = self.concurrency,
            "Scanning targets for open ports"
        );

        let outcomes: Vec<TargetOutcome> = stream::iter(targets)
            .map(|target| self.process_target(target))
            .buffered(self.concurrency)
            .collect()
            .await;

        let scanned = outcomes
            .iter()
            .filter(|o| o.state == TargetState::Scanned)
            .count();
        tracing::info!(
            targets = outcomes.len(),
            scanned,
            failed = outcomes.len() - scanned,
            "Port scanning complete"
        );

        outcomes
    }

    pub async fn process_target(&self, target: &str) -> TargetOutcome {
        let mut state = TargetState::Pending;

        step(target, &mut state, TargetState::Resolving);
        let ip = match self.resolve(target).await {
            Ok(ip) => ip,
            Err(e) => {
                tracing::warn!(target = %target, error = %e, "Could not resolve target");
                step(target, &mut state, TargetState::ResolutionFailed);
                return outcome(target, None, state, Vec::new(), Some(e));
            }
        };
        step(target, &mut state, TargetState::Resolved);

        step(target, &mut state, TargetState::Scanning);
        tracing::info!(target = %target, ip = %ip, "Scanning target");
        let entries = match self.scanner.scan(ip, &self.ports).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(target = %target, ip = %ip, error = %e, "Scan failed");
                step(target, &mut state, TargetState::ScanFailed);
                return outcome(target, Some(ip), state, Vec::new(), Some(e));
            }
        };
        step(target, &mut state, TargetState::Scanned);

        let ports = open_ports(&entries);
        if ports.is_empty() {
            tracing::info!(target = %target, "No open ports found");
        } else {
            tracing::info!(target = %target, open_ports = ports.len(), "Found open ports");
        }

        outcome(target, Some(ip), state, ports, None)
    }

    async fn resolve(&self, target: &str) -> Result<IpAddr> {
        let addrs = self.resolver.lookup_ipv4(target).await?;
        addrs
            .first()
            .map(|a| IpAddr::V4(*a))
            .ok_or_else(|| DiscoverError::Resolve {
                name: target.to_string(),
                reason: "no A records".to_string(),
            })
    }
}

/// Keep the entries in the `open` state, in the order they were reported.
pub fn open_ports(entries: &[RawPortEntry]) -> Vec<PortRecord> {
    entries
        .iter()
        .filter(|e| PortState::parse(&e.state) == PortState::Open)
        .map(|e| {
            PortRecord::new(
                e.port,
                Transport::parse(&e.protocol),
                &e.service,
                e.product.as_deref(),
                e.version.as_deref(),
            )
        })
        .collect()
}

fn step(target: &str, state: &mut TargetState, next: TargetState) {
    match state.advance(next) {
        Ok(()) => tracing::debug!(target = %target, state = %next, "Target state changed"),
        Err(e) => tracing::error!(target = %target, error = %e, "Target state not changed"),
    }
}

fn outcome(
    target: &str,
    ip: Option<IpAddr>,
    state: TargetState,
    ports: Vec<PortRecord>,
    error: Option<DiscoverError>,
) -> TargetOutcome {
    TargetOutcome {
        target: target.to_string(),
        ip,
        state,
        ports,
        error: error.map(|e| e.to_string()),
    }
}
