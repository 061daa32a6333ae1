// src/listener.rs — binary-protocol UDP ingest

use std::net::Ipv4Addr;

use anyhow::Context;
use tokio::net::UdpSocket;
use tokio::sync::mpsc::UnboundedSender;

use crate::infra::config::ListenerConfig;
use crate::metric::{flatten_value_list, FlatMetric};
use crate::proto::{self, Event, Interpreter};

/// Receive collectd network-protocol datagrams and feed flattened values
/// into the sink channel. Notifications are logged, not forwarded.
///
/// Malformed datagrams are logged and skipped; only socket errors or a
/// closed sink end the loop.
pub async fn run(cfg: &ListenerConfig, sender: UnboundedSender<FlatMetric>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", cfg.bind, cfg.port);
    let socket = UdpSocket::bind(&addr)
        .await
        .with_context(|| format!("binding udp listener on {addr}"))?;

    if cfg.multicast {
        let group: Ipv4Addr = cfg
            .group
            .parse()
            .with_context(|| format!("invalid multicast group '{}'", cfg.group))?;
        socket.join_multicast_v4(group, Ipv4Addr::UNSPECIFIED)?;
        tracing::info!("joined multicast group {group}");
    }
    tracing::info!("binary protocol listener on udp://{addr}");

    let mut buf = vec![0u8; proto::RECV_BUFFER_SIZE];
    // collectd opens each packet with the full identity, so one interpreter
    // shared across peers is safe.
    let mut interp = Interpreter::new();

    loop {
        let (len, peer) = socket.recv_from(&mut buf).await?;
        let parts = match proto::decode_packet(&buf[..len]) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!("bad packet from {peer} ({len} bytes): {e}");
                continue;
            }
        };

        for event in interp.feed(parts) {
            match event {
                Event::Values(vl) => {
                    for flat in flatten_value_list(&vl) {
                        if sender.send(flat).is_err() {
                            anyhow::bail!("sink worker is gone");
                        }
                    }
                }
                Event::Notification(nt) => {
                    tracing::info!("notification from {peer}: {nt}");
                }
            }
        }
    }
}
