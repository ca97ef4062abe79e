//! Scan capability.
//!
//! `PortScanner` is the seam between the orchestrator and whatever performs
//! service/version detection. `NmapScanner` runs nmap as a child process via
//! `tokio::process::Command` and converts its XML output into `RawPortEntry`s.

use std::net::IpAddr;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;

use recon_core::PortSpec;

use crate::error::{DiscoverError, Result};
use crate::nmap_xml::{self, NmapPort};

/// One per-port entry as reported by the scan capability, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPortEntry {
    pub port: u16,
    pub protocol: String,
    pub state: String,
    pub service: String,
    pub product: Option<String>,
    pub version: Option<String>,
}

impl From<&NmapPort> for RawPortEntry {
    fn from(p: &NmapPort) -> Self {
        let service = p.service.as_ref();
        Self {
            port: p.port_id,
            protocol: p.protocol.clone(),
            state: p.state.state.clone(),
            service: service.map(|s| s.name.clone()).unwrap_or_default(),
            product: service.and_then(|s| s.product.clone()),
            version: service.and_then(|s| s.version.clone()),
        }
    }
}

/// Service/version detection against a single address.
#[async_trait]
pub trait PortScanner: Send + Sync {
    async fn scan(&self, ip: IpAddr, ports: &PortSpec) -> Result<Vec<RawPortEntry>>;
}

/// Wrapper around the nmap binary.
pub struct NmapScanner {
    nmap_path: String,
    args: Vec<String>,
    host_timeout: Option<String>,
}

impl NmapScanner {
    pub fn new(nmap_path: &str, args: Vec<String>) -> Self {
        Self {
            nmap_path: nmap_path.to_string(),
            args,
            host_timeout: None,
        }
    }

    /// Pass `--host-timeout` through to nmap.
    pub fn with_host_timeout(mut self, timeout: Option<String>) -> Self {
        self.host_timeout = timeout;
        self
    }

    /// Verify nmap is installed and accessible.
    pub async fn verify_installation(&self) -> Result<String> {
        let output = Command::new(&self.nmap_path)
            .arg("--version")
            .output()
            .await
            .map_err(|_| DiscoverError::NmapNotFound {
                path: self.nmap_path.clone(),
            })?;

        if !output.status.success() {
            return Err(DiscoverError::NmapNotFound {
                path: self.nmap_path.clone(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// The full argument list for scanning `ip`.
    pub fn command_args(&self, ip: IpAddr, ports: &PortSpec) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some(timeout) = &self.host_timeout {
            args.push("--host-timeout".to_string());
            args.push(timeout.clone());
        }
        args.extend([
            "-p".to_string(),
            ports.to_string(),
            "-oX".to_string(),
            "-".to_string(),
            "--noninteractive".to_string(),
            ip.to_string(),
        ]);
        args
    }
}

#[async_trait]
impl PortScanner for NmapScanner {
    /// Nmap writes XML to stdout. The child is killed if this future is
    /// dropped, so an interrupted run does not leave scans behind.
    async fn scan(&self, ip: IpAddr, ports: &PortSpec) -> Result<Vec<RawPortEntry>> {
        let start = Instant::now();

        tracing::debug!(ip = %ip, ports = %ports, "Starting nmap scan");

        let output = Command::new(&self.nmap_path)
            .args(self.command_args(ip, ports))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DiscoverError::NmapNotFound {
                path: format!("{}: {e}", self.nmap_path),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(DiscoverError::NmapFailed {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let run = nmap_xml::parse_nmap_xml(&output.stdout)?;
        let entries = entries_for_host(&run, ip)?;

        tracing::debug!(
            ip = %ip,
            entries = entries.len(),
            nmap_version = run.version.as_deref().unwrap_or("unknown"),
            nmap_elapsed_secs = run.elapsed_secs(),
            duration_ms = start.elapsed().as_millis(),
            "Nmap scan complete"
        );

        Ok(entries)
    }
}

/// Pull the port entries for `ip` out of a parsed run.
pub fn entries_for_host(run: &nmap_xml::NmapRun, ip: IpAddr) -> Result<Vec<RawPortEntry>> {
    if let Some(msg) = run.error_message() {
        return Err(DiscoverError::NmapFailed {
            code: 0,
            stderr: msg.to_string(),
        });
    }

    let addr = ip.to_string();
    match run.host(&addr) {
        Some(host) if host.is_up() => Ok(host.ports().iter().map(RawPortEntry::from).collect()),
        _ => Err(DiscoverError::HostUnreachable { addr }),
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 1, 1));

    #[test]
    fn test_command_args() {
        let scanner = NmapScanner::new("nmap", vec!["-T4".into(), "-sV".into()]);
        let ports = PortSpec::parse("22,80").unwrap();
        assert_eq!(
            scanner.command_args(IP, &ports),
            vec!["-T4", "-sV", "-p", "22,80", "-oX", "-", "--noninteractive", "10.0.1.1"]
        );

        let scanner = scanner.with_host_timeout(Some("5m".into()));
        let args = scanner.command_args(IP, &ports);
        assert_eq!(&args[2..4], &["--host-timeout", "5m"]);
    }

    #[test]
    fn test_entries_for_host() {
        let xml = r#"<nmaprun>
  <host>
    <status state="up"/>
    <address addr="10.0.1.1" addrtype="ipv4"/>
    <ports>
      <port protocol="tcp" portid="22">
        <state state="open"/>
        <service name="ssh" product="OpenSSH" version="9.6"/>
      </port>
      <port protocol="udp" portid="161">
        <state state="open|filtered"/>
      </port>
    </ports>
  </host>
</nmaprun>"#;
        let run = nmap_xml::parse_nmap_xml(xml.as_bytes()).unwrap();
        let entries = entries_for_host(&run, IP).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            RawPortEntry {
                port: 22,
                protocol: "tcp".into(),
                state: "open".into(),
                service: "ssh".into(),
                product: Some("OpenSSH".into()),
                version: Some("9.6".into()),
            }
        );
        assert_eq!(entries[1].service, "");
        assert_eq!(entries[1].state, "open|filtered");
    }

    #[test]
    fn test_missing_or_down_host_is_unreachable() {
        let run = nmap_xml::parse_nmap_xml(b"<nmaprun></nmaprun>").unwrap();
        assert!(matches!(
            entries_for_host(&run, IP),
            Err(DiscoverError::HostUnreachable { .. })
        ));

        let xml = r#"<nmaprun><host><status state="down"/><address addr="10.0.1.1" addrtype="ipv4"/></host></nmaprun>"#;
        let run = nmap_xml::parse_nmap_xml(xml.as_bytes()).unwrap();
        assert!(entries_for_host(&run, IP).is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_dependency_error() {
        let scanner = NmapScanner::new("/nonexistent/nmap-binary", vec![]);
        let err = scanner.verify_installation().await.unwrap_err();
        assert!(err.is_dependency_missing());
    }
}
