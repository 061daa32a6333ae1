// src/main.rs — cdrelay entry point

use clap::Parser;

use cdrelay::cli::{Cli, Commands};
use cdrelay::infra::config::Config;
use cdrelay::infra::logger;
use cdrelay::loadgen::{self, LoadgenOpts};

#[tokio::main]
async fn main() {
    // Respects RUST_LOG
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Http { bind, port, sink } => {
            cdrelay::cli::http::run_http(bind, port, &sink, config).await
        }
        Commands::Udp {
            bind,
            port,
            multicast,
            group,
            sink,
        } => cdrelay::cli::udp::run_udp(bind, port, multicast, group, &sink, config).await,
        Commands::Decode { file } => cdrelay::cli::decode::run_decode(file.as_deref()),
        Commands::Loadgen {
            servers,
            rate,
            metrics_per_batch,
            duration,
            url,
        } => {
            loadgen::run(LoadgenOpts {
                servers,
                rate,
                metrics_per_batch,
                duration,
                url,
            })
            .await
        }
    }
}
