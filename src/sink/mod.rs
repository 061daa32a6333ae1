// src/sink/mod.rs — batching output workers

pub mod disk;
pub mod udp;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};

use crate::infra::config::SinkConfig;
use crate::metric::FlatMetric;

/// Selects where batches go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Append newline-delimited JSON to a file
    Disk,
    /// Send each batch as one JSON-array datagram
    Udp,
}

#[async_trait]
pub trait SinkWriter: Send {
    async fn write_batch(&mut self, batch: &[FlatMetric]) -> anyhow::Result<()>;
}

pub async fn writer_from_config(cfg: &SinkConfig) -> anyhow::Result<Box<dyn SinkWriter>> {
    Ok(match cfg.output {
        SinkKind::Disk => Box::new(disk::DiskSink::open(&cfg.output_file).await?),
        SinkKind::Udp => Box::new(udp::UdpSink::connect(&cfg.udp_host, cfg.udp_port).await?),
    })
}

/// Open the configured writer and spawn the batching worker. Dropping all
/// senders drains the buffer and stops the worker.
pub async fn spawn(
    cfg: &SinkConfig,
) -> anyhow::Result<(UnboundedSender<FlatMetric>, JoinHandle<anyhow::Result<()>>)> {
    let writer = writer_from_config(cfg).await?;
    let (tx, rx) = mpsc::unbounded_channel();
    let batch_size = cfg.batch_size;
    let flush_interval = Duration::from_millis(cfg.flush_interval_ms);
    let handle = tokio::spawn(run(rx, writer, batch_size, flush_interval));
    Ok((tx, handle))
}

/// Consume records into a buffer, writing it out when full, on the flush
/// interval, and on channel close.
pub async fn run(
    mut receiver: UnboundedReceiver<FlatMetric>,
    mut writer: Box<dyn SinkWriter>,
    batch_size: usize,
    flush_interval: Duration,
) -> anyhow::Result<()> {
    let mut buffer: Vec<FlatMetric> = Vec::with_capacity(batch_size);
    let mut flush_timer = interval(flush_interval);
    let mut last_write = Instant::now();

    loop {
        tokio::select! {
            next = receiver.recv() => match next {
                Some(metric) => {
                    buffer.push(metric);
                    if buffer.len() >= batch_size {
                        writer.write_batch(&buffer).await?;
                        buffer.clear();
                        last_write = Instant::now();
                    }
                }
                None => {
                    if !buffer.is_empty() {
                        writer.write_batch(&buffer).await?;
                        buffer.clear();
                    }
                    tracing::info!("sink channel closed, worker exiting");
                    break;
                }
            },
            _ = flush_timer.tick() => {
                if !buffer.is_empty() && last_write.elapsed() >= flush_interval {
                    writer.write_batch(&buffer).await?;
                    buffer.clear();
                    last_write = Instant::now();
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct CaptureSink {
        batches: Arc<Mutex<Vec<Vec<FlatMetric>>>>,
    }

    #[async_trait]
    impl SinkWriter for CaptureSink {
        async fn write_batch(&mut self, batch: &[FlatMetric]) -> anyhow::Result<()> {
            self.batches.lock().unwrap().push(batch.to_vec());
            Ok(())
        }
    }

    fn record(n: i64) -> FlatMetric {
        FlatMetric {
            time: Some(n as f64),
            host: Some("t".into()),
            plugin: None,
            plugin_instance: None,
            type_: None,
            type_instance: None,
            value: serde_json::Value::from(n),
        }
    }

    #[tokio::test]
    async fn writes_full_batches_and_drains_on_close() {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let sink = CaptureSink {
            batches: batches.clone(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(rx, Box::new(sink), 3, Duration::from_secs(60)));

        for i in 0..7 {
            tx.send(record(i)).unwrap();
        }
        drop(tx);
        worker.await.unwrap().unwrap();

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[1].len(), 3);
        // The remainder is flushed on close.
        assert_eq!(batches[2].len(), 1);
        assert_eq!(batches[2][0].value, serde_json::Value::from(6));
    }

    #[tokio::test]
    async fn periodic_flush_empties_partial_buffer() {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let sink = CaptureSink {
            batches: batches.clone(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(rx, Box::new(sink), 100, Duration::from_millis(20)));

        tx.send(record(1)).unwrap();
        tx.send(record(2)).unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(batches.lock().unwrap().len(), 1);
        assert_eq!(batches.lock().unwrap()[0].len(), 2);

        drop(tx);
        worker.await.unwrap().unwrap();
    }
}
