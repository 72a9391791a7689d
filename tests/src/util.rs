use std::path::{Path, PathBuf};

/// Shell stand-in for the scanner. It honors `-oX <path>`, treats the
/// last argument as the host and writes one minimal single-host document
/// claiming half a second of scan time. Three magic hosts drive the
/// failure paths: `slow.example` hangs until the deadline kills it,
/// `broken.example` exits non-zero without writing anything, and
/// `garbled.example` exits zero after writing a truncated document.
const FAKE_SCANNER: &str = r#"#!/bin/sh
out=""
host=""
while [ $# -gt 0 ]; do
  case "$1" in
    -oX)
      shift
      out="$1"
      ;;
    *)
      host="$1"
      ;;
  esac
  shift
done

case "$host" in
  slow.example) sleep 10 ;;
  broken.example) exit 2 ;;
  garbled.example) echo "<nmaprun><host" > "$out"; exit 0 ;;
esac

cat > "$out" <<XML
<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="stub" start="1756200000" startstr="stub" version="7.95" xmloutputversion="1.05">
<host><status state="up" reason="syn-ack"/>
<address addr="$host" addrtype="ipv4"/>
<ports><port protocol="tcp" portid="80"><state state="open" reason="syn-ack"/><service name="http" method="probed" conf="10"/></port></ports>
</host>
<runstats>
<finished time="1756200001" timestr="stub" elapsed="0.50" summary="stub" exit="success"/>
<hosts up="1" down="0" total="1"/>
</runstats>
</nmaprun>
XML
"#;

pub fn install_fake_scanner(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-nmap");
    std::fs::write(&path, FAKE_SCANNER).expect("write fake scanner");
    let mut perms = std::fs::metadata(&path)
        .expect("stat fake scanner")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake scanner");
    path
}
