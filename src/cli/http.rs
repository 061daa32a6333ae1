// src/cli/http.rs — `cdrelay http`

use crate::api::{self, ApiState};
use crate::cli::SinkArgs;
use crate::infra::config::Config;
use crate::sink;

pub async fn run_http(
    bind: Option<String>,
    port: Option<u16>,
    sink_args: &SinkArgs,
    mut config: Config,
) -> anyhow::Result<()> {
    if let Some(bind) = bind {
        config.http.bind = bind;
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    sink_args.apply(&mut config.sink);

    let (sender, worker) = sink::spawn(&config.sink).await?;
    let state = ApiState { sender };

    api::start_server(&config.http.bind, config.http.port, state).await?;

    // The server has shut down; all senders are dropped, so the worker
    // drains its buffer and exits.
    worker.await??;
    Ok(())
}
