//! Nmap XML output deserialization.
//!
//! `nmap -oX -` writes structured XML to stdout. Only the parts a
//! service-detection scan of a single address needs are modelled here:
//! host status, addresses, and the per-port state/service elements.

use serde::Deserialize;

use crate::error::{DiscoverError, Result};

/// Root element: `<nmaprun>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "nmaprun")]
pub struct NmapRun {
    #[serde(rename = "@version")]
    pub version: Option<String>,
    #[serde(rename = "host", default)]
    pub hosts: Vec<NmapHost>,
    pub runstats: Option<RunStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NmapHost {
    pub status: Option<HostStatus>,
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    pub ports: Option<Ports>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostStatus {
    #[serde(rename = "@state")]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr")]
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ports {
    #[serde(rename = "port", default)]
    pub ports: Vec<NmapPort>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NmapPort {
    #[serde(rename = "@protocol")]
    pub protocol: String,
    #[serde(rename = "@portid")]
    pub port_id: u16,
    pub state: PortStateElem,
    pub service: Option<NmapService>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortStateElem {
    #[serde(rename = "@state")]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NmapService {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@product")]
    pub product: Option<String>,
    #[serde(rename = "@version")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunStats {
    pub finished: Option<Finished>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Finished {
    #[serde(rename = "@exit")]
    pub exit: Option<String>,
    #[serde(rename = "@errormsg")]
    pub error_msg: Option<String>,
    #[serde(rename = "@elapsed")]
    pub elapsed: Option<String>,
}

impl NmapRun {
    /// Find the host entry for `addr`.
    pub fn host(&self, addr: &str) -> Option<&NmapHost> {
        self.hosts
            .iter()
            .find(|h| h.addresses.iter().any(|a| a.addr == addr))
    }

    /// Wall-clock seconds nmap reported for the run.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.runstats
            .as_ref()?
            .finished
            .as_ref()?
            .elapsed
            .as_deref()?
            .parse()
            .ok()
    }

    /// Nmap's own error message when it finished with `exit="error"`.
    pub fn error_message(&self) -> Option<&str> {
        let finished = self.runstats.as_ref()?.finished.as_ref()?;
        match finished.exit.as_deref() {
            Some("error") => Some(finished.error_msg.as_deref().unwrap_or("unknown error")),
            _ => None,
        }
    }
}

impl NmapHost {
    pub fn is_up(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.state == "up")
    }

    pub fn ports(&self) -> &[NmapPort] {
        self.ports.as_ref().map(|p| p.ports.as_slice()).unwrap_or(&[])
    }
}

/// Parse nmap XML bytes into a structured `NmapRun`.
pub fn parse_nmap_xml(xml: &[u8]) -> Result<NmapRun> {
    quick_xml::de::from_reader(xml).map_err(|e| DiscoverError::XmlParse(format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_SCAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap" args="nmap -T4 -sV -p 22,80,443 -oX - 93.184.216.34" version="7.94">
  <host>
    <status state="up" reason="syn-ack"/>
    <address addr="93.184.216.34" addrtype="ipv4"/>
    <ports>
      <port protocol="tcp" portid="22">
        <state state="closed" reason="reset"/>
        <service name="ssh" method="table" conf="3"/>
      </port>
      <port protocol="tcp" portid="80">
        <state state="open" reason="syn-ack"/>
        <service name="http" product="nginx" version="1.18" method="probed" conf="10"/>
      </port>
      <port protocol="tcp" portid="443">
        <state state="open" reason="syn-ack"/>
        <service name="https" method="table" conf="3"/>
      </port>
    </ports>
  </host>
  <runstats>
    <finished time="1740400100" elapsed="12.04" exit="success"/>
  </runstats>
</nmaprun>"#;

    #[test]
    fn test_parse_service_scan() {
        let run = parse_nmap_xml(SERVICE_SCAN_XML.as_bytes()).unwrap();
        assert_eq!(run.version.as_deref(), Some("7.94"));
        assert!(run.error_message().is_none());
        assert_eq!(run.elapsed_secs(), Some(12.04));

        let host = run.host("93.184.216.34").unwrap();
        assert!(host.is_up());
        assert_eq!(host.ports().len(), 3);

        let http = &host.ports()[1];
        assert_eq!(http.port_id, 80);
        assert_eq!(http.protocol, "tcp");
        assert_eq!(http.state.state, "open");
        let svc = http.service.as_ref().unwrap();
        assert_eq!(svc.name, "http");
        assert_eq!(svc.product.as_deref(), Some("nginx"));
        assert_eq!(svc.version.as_deref(), Some("1.18"));

        let https = host.ports()[2].service.as_ref().unwrap();
        assert!(https.product.is_none());
        assert!(https.version.is_none());

        assert!(run.host("10.0.0.1").is_none());
    }

    #[test]
    fn test_host_without_ports() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap -T4 -sV 10.0.0.9">
  <host>
    <status state="down" reason="no-response"/>
    <address addr="10.0.0.9" addrtype="ipv4"/>
  </host>
</nmaprun>"#;

        let run = parse_nmap_xml(xml.as_bytes()).unwrap();
        assert!(run.elapsed_secs().is_none());
        let host = run.host("10.0.0.9").unwrap();
        assert!(!host.is_up());
        assert!(host.ports().is_empty());
    }

    #[test]
    fn test_error_exit_is_reported() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap">
  <runstats>
    <finished elapsed="0.05" exit="error" errormsg="Failed to resolve target"/>
  </runstats>
</nmaprun>"#;

        let run = parse_nmap_xml(xml.as_bytes()).unwrap();
        assert!(run.hosts.is_empty());
        assert_eq!(run.error_message(), Some("Failed to resolve target"));
    }

    #[test]
    fn test_truncated_xml_is_an_error() {
        let result = parse_nmap_xml(b"<nmaprun><host><status state=\"up\"/>");
        assert!(matches!(result, Err(DiscoverError::XmlParse(_))));
    }
}
