//! Scan target aggregation.

use std::collections::BTreeSet;

/// Discovered subdomains followed by the base domain, each exactly once.
pub fn aggregate_targets(discovered: &BTreeSet<String>, base_domain: &str) -> Vec<String> {
    let mut targets: Vec<String> = discovered
        .iter()
        .filter(|name| name.as_str() != base_domain)
        .cloned()
        .collect();
    targets.push(base_domain.to_string());
    targets
}
