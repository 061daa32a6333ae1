// src/cli/decode.rs — `cdrelay decode`

use std::io::{Read, Write};

use anyhow::Context;

use crate::metric::flatten_value_list;
use crate::proto::{self, Event, Interpreter};

/// Decode one packet's worth of raw bytes and print each event as a JSON
/// line: value lists as flat records, notifications with severity.
pub fn run_decode(file: Option<&str>) -> anyhow::Result<()> {
    let buf = match file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading packet file {path}"))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let parts = proto::decode_packet(&buf)?;
    let mut interp = Interpreter::new();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for event in interp.feed(parts) {
        match event {
            Event::Values(vl) => {
                for flat in flatten_value_list(&vl) {
                    serde_json::to_writer(&mut out, &flat)?;
                    out.write_all(b"\n")?;
                }
            }
            Event::Notification(nt) => {
                let record = serde_json::json!({
                    "time": nt.identity.time,
                    "host": nt.identity.host,
                    "plugin": nt.identity.plugin,
                    "severity": nt.severity_str(),
                    "message": nt.message,
                });
                serde_json::to_writer(&mut out, &record)?;
                out.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
