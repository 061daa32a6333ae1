// src/infra/config.rs — Configuration loading (TOML)

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::proto;
use crate::sink::SinkKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub listener: ListenerConfig,

    #[serde(default)]
    pub sink: SinkConfig,
}

/// HTTP receiver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Binary-protocol UDP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub bind: String,
    pub port: u16,
    pub multicast: bool,
    /// IPv4 group joined when multicast is enabled.
    pub group: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: proto::DEFAULT_PORT,
            multicast: false,
            group: proto::DEFAULT_IPV4_GROUP.into(),
        }
    }
}

/// Output sink settings shared by both ingest paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub output: SinkKind,
    pub batch_size: usize,
    pub flush_interval_ms: u64,
    /// Disk sink target.
    pub output_file: String,
    /// UDP sink target.
    pub udp_host: String,
    pub udp_port: u16,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            output: SinkKind::Disk,
            batch_size: 100,
            flush_interval_ms: 1000,
            output_file: "collectd.out".into(),
            udp_host: "localhost".into(),
            udp_port: 9999,
        }
    }
}

impl Config {
    /// Load from an explicit path, or fall back to defaults when none is
    /// given. A missing explicit path is an error.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load_from(Path::new(p)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}
