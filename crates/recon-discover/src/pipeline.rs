//! End-to-end run: brute force → aggregate → scan → report.
//!
//! The two phases never overlap: every candidate name has been tried before
//! the first target is scanned, and the `Report` only exists once every
//! target has reached a terminal state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use recon_core::{Report, TargetDomain};

use crate::config::ReconConfig;
use crate::error::{DiscoverError, Result};
use crate::orchestrator::Orchestrator;
use crate::resolver::{HickoryResolver, NameResolver, ResolverPool};
use crate::scanner::{NmapScanner, PortScanner};
use crate::targets::aggregate_targets;

pub struct ReconPipeline<R, S> {
    pool: ResolverPool<R>,
    orchestrator: Orchestrator<R, S>,
}

impl<R: NameResolver + Clone, S: PortScanner> ReconPipeline<R, S> {
    pub fn new(resolver: R, scanner: S, config: &ReconConfig) -> Self {
        Self {
            pool: ResolverPool::new(resolver.clone(), config.threads),
            orchestrator: Orchestrator::new(
                resolver,
                scanner,
                config.ports.clone(),
                config.scan_concurrency,
            ),
        }
    }

    pub async fn run(&self, domain: &TargetDomain, wordlist: &[String]) -> Report {
        let subdomains = self.pool.discover(domain, wordlist).await;
        let targets = aggregate_targets(&subdomains, &domain.base);
        let outcomes = self.orchestrator.run(&targets).await;

        let report = Report::new(&domain.host, &domain.base, subdomains, outcomes);
        tracing::info!(
            run_id = %report.run_id,
            target = %report.target,
            subdomains = report.subdomains.len(),
            scanned = report.scan_results.len(),
            open_ports = report.open_port_count(),
            "Reconnaissance complete"
        );
        report
    }
}

impl ReconPipeline<Arc<HickoryResolver>, NmapScanner> {
    /// Build the production pipeline, failing before any enumeration if nmap
    /// or the system resolver is unavailable.
    pub async fn from_config(config: &ReconConfig) -> Result<Self> {
        let scanner = NmapScanner::new(&config.nmap_path, config.nmap_args.clone())
            .with_host_timeout(config.host_timeout.clone());
        let version = scanner.verify_installation().await?;
        tracing::info!(
            nmap_version = %version.lines().next().unwrap_or_default().trim(),
            "Nmap verified"
        );

        let resolver = HickoryResolver::from_system_conf(Duration::from_secs(
            config.dns_timeout_secs,
        ))?;

        Ok(Self::new(Arc::new(resolver), scanner, config))
    }
}

/// Run `work` unless `interrupt` completes first.
///
/// When interrupted, `work` is dropped mid-flight and nothing it was building
/// is returned.
pub async fn run_until_interrupted<T, E, W, I>(
    work: W,
    interrupt: I,
) -> std::result::Result<T, E>
where
    W: Future<Output = std::result::Result<T, E>>,
    I: Future<Output = ()>,
    E: From<DiscoverError>,
{
    tokio::select! {
        biased;
        _ = interrupt => Err(DiscoverError::Interrupted.into()),
        res = work => res,
    }
}
