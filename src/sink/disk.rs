// src/sink/disk.rs — newline-delimited JSON file sink

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::metric::FlatMetric;
use crate::sink::SinkWriter;

pub struct DiskSink {
    file: File,
    path: PathBuf,
}

impl DiskSink {
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("opening sink file {}", path.display()))?;
        tracing::info!("disk sink appending to {}", path.display());
        Ok(Self { file, path })
    }
}

#[async_trait]
impl SinkWriter for DiskSink {
    async fn write_batch(&mut self, batch: &[FlatMetric]) -> anyhow::Result<()> {
        let mut out = Vec::with_capacity(batch.len() * 128);
        for metric in batch {
            serde_json::to_writer(&mut out, metric)?;
            out.push(b'\n');
        }
        self.file.write_all(&out).await?;
        self.file.flush().await?;
        tracing::debug!(
            "wrote {} datapoints to {}",
            batch.len(),
            self.path.display()
        );
        Ok(())
    }
}
