//! Target normalization.
//!
//! Turns whatever the operator typed (`https://WWW.Example.com/login`,
//! `api.example.com:8443`, `example.com.`) into the host that was named and
//! the two-label base domain that candidate names are built on.

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// A normalized reconnaissance target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDomain {
    /// The cleaned host as given (lowercase, no scheme, path, or port).
    pub host: String,
    /// The base domain: the last two labels of `host`.
    pub base: String,
}

impl TargetDomain {
    /// Parse an arbitrary input string into a canonical target.
    pub fn parse(input: &str) -> Result<Self> {
        let host = clean_host(input);
        if host.is_empty() || host.split('.').any(str::is_empty) {
            return Err(ReconError::InvalidTarget(input.to_string()));
        }

        let base = base_domain(&host);
        Ok(Self { host, base })
    }

    /// Build the trial fully-qualified name for a wordlist label.
    ///
    /// DNS names are case-insensitive, so the label is lowercased to keep
    /// `www` and `WWW` from landing in the result set twice.
    pub fn candidate(&self, label: &str) -> String {
        format!("{}.{}", label.to_lowercase(), self.base)
    }
}

impl std::fmt::Display for TargetDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.host)
    }
}

fn clean_host(input: &str) -> String {
    let lowered = input.trim().to_lowercase();

    let without_scheme = ["http://", "https://"]
        .iter()
        .find_map(|scheme| lowered.strip_prefix(scheme))
        .unwrap_or(&lowered);

    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    let host = match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    };

    host.trim_end_matches('.').to_string()
}

fn base_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        host.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_domain() {
        let t = TargetDomain::parse("example.com").unwrap();
        assert_eq!(t.host, "example.com");
        assert_eq!(t.base, "example.com");
    }

    #[test]
    fn test_url_with_scheme_and_path() {
        let t = TargetDomain::parse("HTTPS://WWW.Example.COM/login?next=/").unwrap();
        assert_eq!(t.host, "www.example.com");
        assert_eq!(t.base, "example.com");
    }

    #[test]
    fn test_port_and_trailing_dot_are_dropped() {
        let t = TargetDomain::parse("http://api.dev.example.org:8443/").unwrap();
        assert_eq!(t.host, "api.dev.example.org");
        assert_eq!(t.base, "example.org");

        let t = TargetDomain::parse("  example.net. ").unwrap();
        assert_eq!(t.host, "example.net");
    }

    #[test]
    fn test_single_label_is_its_own_base() {
        let t = TargetDomain::parse("localhost").unwrap();
        assert_eq!(t.base, "localhost");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            TargetDomain::parse("https:///"),
            Err(ReconError::InvalidTarget(_))
        ));
        assert!(TargetDomain::parse("   ").is_err());
        assert!(TargetDomain::parse("example..com").is_err());
    }

    #[test]
    fn test_candidate_uses_base_domain() {
        let t = TargetDomain::parse("www.example.com").unwrap();
        assert_eq!(t.candidate("mail"), "mail.example.com");
        assert_eq!(t.candidate("WWW"), "www.example.com");
    }
}
