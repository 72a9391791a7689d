//! Typed model of the scanner's XML output.
//!
//! Intentionally partial: it keeps the parts this tool reads (host
//! sub-trees, run statistics) and re-emits, not the full schema. Fields the
//! model does not know are dropped on re-serialization, which is acceptable
//! because the merged document is this tool's own report format.
//!
//! Attribute fields are declared before element fields in every struct;
//! the serializer requires that order.

use serde::{Deserialize, Serialize};

/// One scan run, partial (per host) or merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "nmaprun")]
pub struct NmapRun {
    #[serde(rename = "@scanner", default)]
    pub scanner: String,
    #[serde(rename = "@args", default, skip_serializing_if = "String::is_empty")]
    pub args: String,
    #[serde(rename = "@start", default)]
    pub start: i64,
    #[serde(rename = "@startstr", default, skip_serializing_if = "String::is_empty")]
    pub startstr: String,
    #[serde(rename = "@version", default)]
    pub version: String,
    #[serde(
        rename = "@xmloutputversion",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub xmloutputversion: String,

    #[serde(rename = "scaninfo", default, skip_serializing_if = "Vec::is_empty")]
    pub scaninfo: Vec<ScanInfo>,
    #[serde(rename = "verbose", default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<Verbose>,
    #[serde(rename = "debugging", default, skip_serializing_if = "Option::is_none")]
    pub debugging: Option<Debugging>,
    #[serde(rename = "host", default)]
    pub hosts: Vec<Host>,
    #[serde(rename = "runstats")]
    pub runstats: RunStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInfo {
    #[serde(rename = "@type", default)]
    pub scan_type: String,
    #[serde(rename = "@protocol", default)]
    pub protocol: String,
    #[serde(rename = "@numservices", default)]
    pub numservices: u32,
    #[serde(rename = "@services", default, skip_serializing_if = "String::is_empty")]
    pub services: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verbose {
    #[serde(rename = "@level", default)]
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debugging {
    #[serde(rename = "@level", default)]
    pub level: u8,
}

/// One scanned host sub-tree. Aggregation concatenates these, it never
/// merges two of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    #[serde(rename = "@starttime", default, skip_serializing_if = "Option::is_none")]
    pub starttime: Option<i64>,
    #[serde(rename = "@endtime", default, skip_serializing_if = "Option::is_none")]
    pub endtime: Option<i64>,

    pub status: Status,
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    #[serde(rename = "hostnames", default, skip_serializing_if = "Option::is_none")]
    pub hostnames: Option<Hostnames>,
    #[serde(rename = "ports", default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Ports>,
    #[serde(rename = "times", default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Times>,
}

impl Host {
    /// The address the scanner lists first, usually the target itself.
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses.first().map(|a| a.addr.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(rename = "@reason_ttl", default, skip_serializing_if = "String::is_empty")]
    pub reason_ttl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr")]
    pub addr: String,
    #[serde(rename = "@addrtype", default)]
    pub addrtype: String,
    #[serde(rename = "@vendor", default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostnames {
    #[serde(rename = "hostname", default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<Hostname>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostname {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ports {
    #[serde(rename = "extraports", default, skip_serializing_if = "Vec::is_empty")]
    pub extraports: Vec<ExtraPorts>,
    #[serde(rename = "port", default)]
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraPorts {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@count", default)]
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    #[serde(rename = "@protocol", default)]
    pub protocol: String,
    #[serde(rename = "@portid")]
    pub portid: u16,

    pub state: PortState,
    #[serde(rename = "service", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(rename = "script", default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<Script>,
}

impl Port {
    pub fn is_open(&self) -> bool {
        self.state.state == "open"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortState {
    #[serde(rename = "@state", default)]
    pub state: String,
    #[serde(rename = "@reason", default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(rename = "@reason_ttl", default, skip_serializing_if = "String::is_empty")]
    pub reason_ttl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@product", default, skip_serializing_if = "String::is_empty")]
    pub product: String,
    #[serde(rename = "@version", default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(rename = "@extrainfo", default, skip_serializing_if = "String::is_empty")]
    pub extrainfo: String,
    #[serde(rename = "@method", default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(rename = "@conf", default, skip_serializing_if = "String::is_empty")]
    pub conf: String,

    #[serde(rename = "cpe", default, skip_serializing_if = "Vec::is_empty")]
    pub cpe: Vec<String>,
}

/// Script output rides in attributes; nested table output is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(rename = "@output", default, skip_serializing_if = "String::is_empty")]
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Times {
    #[serde(rename = "@srtt", default)]
    pub srtt: String,
    #[serde(rename = "@rttvar", default)]
    pub rttvar: String,
    #[serde(rename = "@to", default)]
    pub to: String,
}

/// Run statistics. The three host counters and the elapsed duration are
/// the fields aggregation sums across partial documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub finished: Finished,
    pub hosts: HostStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finished {
    #[serde(rename = "@time", default)]
    pub time: i64,
    #[serde(rename = "@timestr", default, skip_serializing_if = "String::is_empty")]
    pub timestr: String,
    #[serde(rename = "@elapsed", default)]
    pub elapsed: f64,
    #[serde(rename = "@summary", default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(rename = "@exit", default, skip_serializing_if = "String::is_empty")]
    pub exit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostStats {
    #[serde(rename = "@up", default)]
    pub up: u32,
    #[serde(rename = "@down", default)]
    pub down: u32,
    #[serde(rename = "@total", default)]
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_HOST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap -sV -oX /tmp/h.xml 10.0.0.5" start="1756200000" startstr="Tue Aug 26 10:00:00 2025" version="7.95" xmloutputversion="1.05">
<scaninfo type="syn" protocol="tcp" numservices="1000" services="1-1000"/>
<verbose level="0"/>
<debugging level="0"/>
<host starttime="1756200000" endtime="1756200042">
<status state="up" reason="user-set" reason_ttl="0"/>
<address addr="10.0.0.5" addrtype="ipv4"/>
<hostnames>
<hostname name="files.lan" type="PTR"/>
</hostnames>
<ports>
<extraports state="closed" count="998"/>
<port protocol="tcp" portid="22">
<state state="open" reason="syn-ack" reason_ttl="64"/>
<service name="ssh" product="OpenSSH" version="9.6" method="probed" conf="10">
<cpe>cpe:/a:openbsd:openssh:9.6</cpe>
</service>
<script id="vulners" output="no findings"/>
</port>
<port protocol="tcp" portid="80">
<state state="filtered" reason="no-response" reason_ttl="0"/>
</port>
</ports>
<times srtt="251" rttvar="112" to="100000"/>
</host>
<runstats>
<finished time="1756200042" timestr="Tue Aug 26 10:00:42 2025" elapsed="42.51" summary="1 IP address scanned" exit="success"/>
<hosts up="1" down="0" total="1"/>
</runstats>
</nmaprun>
"#;

    #[test]
    fn parses_a_full_scan_document() {
        let run: NmapRun = quick_xml::de::from_str(ONE_HOST).unwrap();

        assert_eq!(run.scanner, "nmap");
        assert_eq!(run.version, "7.95");
        assert_eq!(run.start, 1756200000);
        assert_eq!(run.scaninfo.len(), 1);
        assert_eq!(run.scaninfo[0].numservices, 1000);

        assert_eq!(run.hosts.len(), 1);
        let host = &run.hosts[0];
        assert_eq!(host.status.state, "up");
        assert_eq!(host.primary_address(), Some("10.0.0.5"));

        let ports = host.ports.as_ref().unwrap();
        assert_eq!(ports.extraports[0].count, 998);
        assert_eq!(ports.ports.len(), 2);

        let ssh = &ports.ports[0];
        assert_eq!(ssh.portid, 22);
        assert!(ssh.is_open());
        let service = ssh.service.as_ref().unwrap();
        assert_eq!(service.product, "OpenSSH");
        assert_eq!(service.cpe, vec!["cpe:/a:openbsd:openssh:9.6"]);
        assert_eq!(ssh.scripts[0].id, "vulners");

        assert!(!ports.ports[1].is_open());
        assert!(ports.ports[1].service.is_none());

        assert_eq!(run.runstats.hosts.up, 1);
        assert_eq!(run.runstats.hosts.total, 1);
        assert!((run.runstats.finished.elapsed - 42.51).abs() < f64::EPSILON);
    }

    #[test]
    fn tolerates_sparse_documents() {
        let sparse = r#"<nmaprun scanner="nmap">
<host><status state="down"/><address addr="10.0.0.9" addrtype="ipv4"/></host>
<runstats><finished time="0" elapsed="1.0"/><hosts up="0" down="1" total="1"/></runstats>
</nmaprun>"#;

        let run: NmapRun = quick_xml::de::from_str(sparse).unwrap();
        assert_eq!(run.hosts.len(), 1);
        assert!(run.hosts[0].ports.is_none());
        assert_eq!(run.runstats.hosts.down, 1);
    }

    #[test]
    fn missing_runstats_is_a_parse_error() {
        let truncated = r#"<nmaprun scanner="nmap"><host><status state="up"/></host></nmaprun>"#;
        assert!(quick_xml::de::from_str::<NmapRun>(truncated).is_err());
    }

    #[test]
    fn reemitted_document_keeps_the_findings() {
        let run: NmapRun = quick_xml::de::from_str(ONE_HOST).unwrap();

        let mut out = String::new();
        let ser = quick_xml::se::Serializer::with_root(&mut out, Some("nmaprun")).unwrap();
        run.serialize(ser).unwrap();

        assert!(out.starts_with("<nmaprun"));
        assert!(out.contains(r#"scanner="nmap""#));
        assert!(out.contains(r#"portid="22""#));
        assert!(out.contains(r#"product="OpenSSH""#));
        assert!(out.contains("<cpe>cpe:/a:openbsd:openssh:9.6</cpe>"));
        assert!(out.contains(r#"up="1""#));

        // and it parses back
        let again: NmapRun = quick_xml::de::from_str(&out).unwrap();
        assert_eq!(again.hosts.len(), run.hosts.len());
        assert_eq!(again.runstats.hosts.total, 1);
    }
}
