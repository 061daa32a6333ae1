// src/sink/udp.rs — JSON-array datagram sink

use anyhow::Context;
use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::metric::FlatMetric;
use crate::sink::SinkWriter;

pub struct UdpSink {
    socket: UdpSocket,
    target: String,
}

impl UdpSink {
    pub async fn connect(host: &str, port: u16) -> anyhow::Result<Self> {
        let target = format!("{host}:{port}");
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket
            .connect(&target)
            .await
            .with_context(|| format!("connecting udp sink to {target}"))?;
        tracing::info!("udp sink sending to {target}");
        Ok(Self { socket, target })
    }
}

#[async_trait]
impl SinkWriter for UdpSink {
    async fn write_batch(&mut self, batch: &[FlatMetric]) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(batch)?;
        self.socket.send(&payload).await?;
        tracing::debug!("sent {} datapoints to {}", batch.len(), self.target);
        Ok(())
    }
}
