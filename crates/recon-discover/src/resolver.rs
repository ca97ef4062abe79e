//! DNS brute force.
//!
//! `ResolverPool` tries `label.base` for every wordlist label with a fixed
//! number of lookups in flight. Each lookup yields its own `Candidate`; the
//! pool merges them into a set only after every lookup has finished.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;

use recon_core::TargetDomain;

use crate::error::{DiscoverError, Result};

/// Hostname → IPv4 lookup capability.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Return the A records for `name`. An empty list means the name has none.
    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>>;
}

#[async_trait]
impl<T: NameResolver + ?Sized> NameResolver for Arc<T> {
    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        (**self).lookup_ipv4(name).await
    }
}

/// System DNS resolver backed by hickory.
pub struct HickoryResolver {
    inner: TokioResolver,
}

impl HickoryResolver {
    /// Build from the system resolver configuration with a single attempt
    /// per lookup, bounded by `timeout`.
    pub fn from_system_conf(timeout: Duration) -> Result<Self> {
        let mut builder = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| DiscoverError::ResolverInit(e.to_string()))?;

        let opts = builder.options_mut();
        opts.timeout = timeout;
        opts.attempts = 1;

        Ok(Self {
            inner: builder.build(),
        })
    }
}

#[async_trait]
impl NameResolver for HickoryResolver {
    async fn lookup_ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        let lookup = self
            .inner
            .ipv4_lookup(absolute_name(name))
            .await
            .map_err(|e| DiscoverError::Resolve {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(lookup.iter().map(|a| a.0).collect())
    }
}

/// Root `name` so the lookup never falls back to the system search list.
pub fn absolute_name(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

/// The result of trying one candidate name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Found(String),
    NotFound,
}

impl Candidate {
    pub fn into_found(self) -> Option<String> {
        match self {
            Self::Found(fqdn) => Some(fqdn),
            Self::NotFound => None,
        }
    }
}

/// Bounded-concurrency subdomain resolver.
pub struct ResolverPool<R> {
    resolver: R,
    width: usize,
}

impl<R: NameResolver> ResolverPool<R> {
    /// `width` is the number of lookups in flight; 0 is treated as 1.
    pub fn new(resolver: R, width: usize) -> Self {
        Self {
            resolver,
            width: width.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Try a single fully-qualified name. Lookup failures are absence.
    pub async fn check(&self, fqdn: String) -> Candidate {
        match self.resolver.lookup_ipv4(&fqdn).await {
            Ok(addrs) if !addrs.is_empty() => {
                tracing::info!(subdomain = %fqdn, addrs = addrs.len(), "Found subdomain");
                Candidate::Found(fqdn)
            }
            Ok(_) => Candidate::NotFound,
            Err(e) => {
                tracing::debug!(candidate = %fqdn, error = %e, "Candidate did not resolve");
                Candidate::NotFound
            }
        }
    }

    /// Resolve every `label.base` and return the names that answered.
    ///
    /// Returns only after all labels have been tried.
    pub async fn discover(&self, domain: &TargetDomain, wordlist: &[String]) -> BTreeSet<String> {
        tracing::info!(
            base_domain = %domain.base,
            candidates = wordlist.len(),
            width = self.width,
            "Starting DNS brute force"
        );

        let candidates: Vec<Candidate> = stream::iter(wordlist)
            .map(|label| self.check(domain.candidate(label)))
            .buffer_unordered(self.width)
            .collect()
            .await;

        let found: BTreeSet<String> = candidates
            .into_iter()
            .filter_map(Candidate::into_found)
            .collect();

        tracing::info!(
            base_domain = %domain.base,
            found = found.len(),
            "DNS brute force complete"
        );

        found
    }
}
