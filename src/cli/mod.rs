// src/cli/mod.rs — CLI definition (clap derive)

pub mod decode;
pub mod http;
pub mod udp;

use clap::{Args, Parser, Subcommand};

use crate::infra::config::SinkConfig;
use crate::sink::SinkKind;

#[derive(Parser)]
#[command(name = "cdrelay", about = "collectd metrics relay", version)]
pub struct Cli {
    /// Config file path (TOML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Receive write_http JSON over HTTP and relay to the sink
    Http {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        sink: SinkArgs,
    },
    /// Receive collectd's binary network protocol over UDP
    Udp {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (collectd default 25826)
        #[arg(short, long)]
        port: Option<u16>,

        /// Join the IPv4 multicast group
        #[arg(long)]
        multicast: bool,

        /// Multicast group to join (default 239.192.74.66)
        #[arg(long)]
        group: Option<String>,

        #[command(flatten)]
        sink: SinkArgs,
    },
    /// Decode raw binary-protocol packet bytes to JSON lines
    Decode {
        /// Packet file to read (stdin if omitted)
        file: Option<String>,
    },
    /// Generate write_http load against an HTTP receiver
    Loadgen {
        /// Number of simulated servers
        #[arg(long, default_value = "10")]
        servers: usize,

        /// Requests per second per server (collectd's 10s interval is 0.1)
        #[arg(long, default_value = "1.0")]
        rate: f64,

        /// Metrics per request body
        #[arg(long, default_value = "20")]
        metrics_per_batch: usize,

        /// Test duration in seconds
        #[arg(long, default_value = "30")]
        duration: u64,

        /// Target endpoint
        #[arg(long, default_value = "http://localhost:8080/collectd")]
        url: String,
    },
}

/// Sink flags shared by both ingest commands; unset flags fall back to
/// the config file.
#[derive(Args, Debug, Default)]
pub struct SinkArgs {
    /// Where batches go
    #[arg(short, long, value_enum)]
    pub output: Option<SinkKind>,

    /// Records per batch before a write
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Flush interval in milliseconds
    #[arg(long)]
    pub flush_interval_ms: Option<u64>,

    /// Output file path (disk sink)
    #[arg(long)]
    pub output_file: Option<String>,

    /// Target host (udp sink)
    #[arg(long)]
    pub udp_host: Option<String>,

    /// Target port (udp sink)
    #[arg(long)]
    pub udp_port: Option<u16>,
}

impl SinkArgs {
    pub fn apply(&self, cfg: &mut SinkConfig) {
        if let Some(output) = self.output {
            cfg.output = output;
        }
        if let Some(batch_size) = self.batch_size {
            cfg.batch_size = batch_size;
        }
        if let Some(ms) = self.flush_interval_ms {
            cfg.flush_interval_ms = ms;
        }
        if let Some(ref path) = self.output_file {
            cfg.output_file = path.clone();
        }
        if let Some(ref host) = self.udp_host {
            cfg.udp_host = host.clone();
        }
        if let Some(port) = self.udp_port {
            cfg.udp_port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sink_args_override_config() {
        let mut cfg = SinkConfig::default();
        let args = SinkArgs {
            output: Some(SinkKind::Udp),
            batch_size: Some(7),
            udp_port: Some(4242),
            ..Default::default()
        };
        args.apply(&mut cfg);
        assert_eq!(cfg.output, SinkKind::Udp);
        assert_eq!(cfg.batch_size, 7);
        assert_eq!(cfg.udp_port, 4242);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.flush_interval_ms, 1000);
        assert_eq!(cfg.output_file, "collectd.out");
    }
}
