// src/cli/udp.rs — `cdrelay udp`

use crate::cli::SinkArgs;
use crate::infra::config::Config;
use crate::{listener, sink};

pub async fn run_udp(
    bind: Option<String>,
    port: Option<u16>,
    multicast: bool,
    group: Option<String>,
    sink_args: &SinkArgs,
    mut config: Config,
) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        config.listener.bind = bind;
    }
    if let Some(port) = port {
        config.listener.port = port;
    }
    if multicast {
        config.listener.multicast = true;
    }
    if let Some(group) = group {
        config.listener.group = group;
        config.listener.multicast = true;
    }
    sink_args.apply(&mut config.sink);

    let (sender, worker) = sink::spawn(&config.sink).await?;

    tokio::select! {
        res = listener::run(&config.listener, sender) => res?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
    }

    // Dropping the listener future released the last sender; wait for the
    // worker to drain.
    worker.await??;
    Ok(())
}
