//! Port specifications handed to the scan capability.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// The 20 well-known service ports scanned when nothing else is requested.
pub const DEFAULT_PORTS: [u16; 20] = [
    21, 22, 23, 25, 53, 80, 110, 111, 135, 139, 143, 443, 445, 993, 995, 1723, 3306, 3389, 5900,
    8080,
];

/// A comma-separated list of ports and inclusive `a-b` ranges.
///
/// Entries keep the order they were given in; `Display` renders the form
/// nmap's `-p` flag accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortSpec {
    entries: Vec<RangeInclusive<u16>>,
}

impl PortSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: String| ReconError::InvalidPortSpec {
            spec: spec.to_string(),
            reason,
        };

        let mut entries = Vec::new();
        for raw in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let range = match raw.split_once('-') {
                Some((lo, hi)) => {
                    let lo = parse_port(lo.trim()).map_err(&invalid)?;
                    let hi = parse_port(hi.trim()).map_err(&invalid)?;
                    if lo > hi {
                        return Err(invalid(format!("range {raw} is reversed")));
                    }
                    lo..=hi
                }
                None => {
                    let port = parse_port(raw).map_err(&invalid)?;
                    port..=port
                }
            };
            entries.push(range);
        }

        if entries.is_empty() {
            return Err(invalid("no ports given".to_string()));
        }

        Ok(Self { entries })
    }

    /// Total number of ports covered, counting overlaps once per entry.
    pub fn port_count(&self) -> usize {
        self.entries
            .iter()
            .map(|r| usize::from(*r.end() - *r.start()) + 1)
            .sum()
    }

    pub fn contains(&self, port: u16) -> bool {
        self.entries.iter().any(|r| r.contains(&port))
    }
}

impl Default for PortSpec {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PORTS.iter().map(|&p| p..=p).collect(),
        }
    }
}

fn parse_port(raw: &str) -> std::result::Result<u16, String> {
    match raw.parse::<u16>() {
        Ok(0) => Err("port 0 is not scannable".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!("'{raw}' is not a port number")),
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .entries
            .iter()
            .map(|r| {
                if r.start() == r.end() {
                    r.start().to_string()
                } else {
                    format!("{}-{}", r.start(), r.end())
                }
            })
            .collect();
        write!(f, "{}", rendered.join(","))
    }
}

impl FromStr for PortSpec {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PortSpec {
    type Error = ReconError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PortSpec> for String {
    fn from(spec: PortSpec) -> Self {
        spec.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let spec = PortSpec::default();
        assert_eq!(spec.port_count(), 20);
        assert_eq!(
            spec.to_string(),
            "21,22,23,25,53,80,110,111,135,139,143,443,445,993,995,1723,3306,3389,5900,8080"
        );
        assert!(spec.contains(3389));
        assert!(!spec.contains(8443));
    }

    #[test]
    fn test_ranges_and_whitespace() {
        let spec = PortSpec::parse(" 22, 80-85 ,443,").unwrap();
        assert_eq!(spec.to_string(), "22,80-85,443");
        assert_eq!(spec.port_count(), 8);
        assert!(spec.contains(83));
    }

    #[test]
    fn test_invalid_specs() {
        for bad in ["", ",", "http", "0", "70000", "90-80", "1-x"] {
            assert!(
                matches!(
                    PortSpec::parse(bad),
                    Err(ReconError::InvalidPortSpec { .. })
                ),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let spec: PortSpec = serde_json::from_str("\"22,8000-8080\"").unwrap();
        assert_eq!(spec.port_count(), 82);
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"22,8000-8080\"");
    }
}
