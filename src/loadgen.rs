// src/loadgen.rs — write_http load generator
//
// Simulates a fleet of collectd servers POSTing JSON batches at a fixed
// per-server rate, then reports latency percentiles and throughput.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::metric::WriteHttpMetric;

const PLUGINS: &[&str] = &["cpu", "memory", "disk", "network", "load"];
const TYPES: &[&str] = &["gauge", "derive", "counter"];

#[derive(Debug, Clone)]
pub struct LoadgenOpts {
    pub servers: usize,
    /// Requests per second per server; collectd's 10s interval is 0.1.
    pub rate: f64,
    pub metrics_per_batch: usize,
    pub duration: u64,
    pub url: String,
}

#[derive(Debug, Default)]
struct Stats {
    success: u64,
    errors: u64,
    latencies: Vec<Duration>,
}

fn generate_metric(hostname: &str) -> WriteHttpMetric {
    let mut rng = rand::rng();
    WriteHttpMetric {
        host: Some(hostname.to_string()),
        plugin: Some(PLUGINS[rng.random_range(0..PLUGINS.len())].to_string()),
        plugin_instance: Some(rng.random_range(0..8u8).to_string()),
        type_: Some(TYPES[rng.random_range(0..TYPES.len())].to_string()),
        type_instance: Some("value".to_string()),
        time: Some(chrono::Utc::now().timestamp_millis() as f64 / 1000.0),
        interval: Some(10.0),
        values: Some(vec![serde_json::Value::from(rng.random::<f64>() * 100.0)]),
        dstypes: Some(vec!["gauge".to_string()]),
        dsnames: Some(vec!["value".to_string()]),
        value: None,
    }
}

async fn send_batch(
    client: &reqwest::Client,
    url: &str,
    hostname: &str,
    batch_size: usize,
    stats: &Mutex<Stats>,
) {
    let batch: Vec<WriteHttpMetric> = (0..batch_size).map(|_| generate_metric(hostname)).collect();

    let start = Instant::now();
    match client.post(url).json(&batch).send().await {
        Ok(resp) if matches!(resp.status().as_u16(), 200 | 204) => {
            let elapsed = start.elapsed();
            let mut stats = stats.lock().expect("stats lock");
            stats.success += 1;
            stats.latencies.push(elapsed);
        }
        Ok(resp) => {
            stats.lock().expect("stats lock").errors += 1;
            tracing::warn!("{hostname}: HTTP {}", resp.status());
        }
        Err(e) => {
            stats.lock().expect("stats lock").errors += 1;
            tracing::warn!("{hostname}: {e}");
        }
    }
}

async fn server_worker(server_id: usize, opts: Arc<LoadgenOpts>, stats: Arc<Mutex<Stats>>) {
    let hostname = format!("host-{server_id:04}.void.void");
    let pause = if opts.rate > 0.0 {
        Duration::from_secs_f64(1.0 / opts.rate)
    } else {
        Duration::from_secs(1)
    };
    let client = reqwest::Client::new();
    let deadline = Instant::now() + Duration::from_secs(opts.duration);

    while Instant::now() < deadline {
        send_batch(&client, &opts.url, &hostname, opts.metrics_per_batch, &stats).await;
        tokio::time::sleep(pause).await;
    }
}

pub async fn run(opts: LoadgenOpts) -> anyhow::Result<()> {
    println!("Starting load test:");
    println!("  Servers: {}", opts.servers);
    println!("  Rate: {} requests/sec per server", opts.rate);
    println!("  Batch size: {} metrics per request", opts.metrics_per_batch);
    println!("  Duration: {} seconds", opts.duration);
    println!("  Target URL: {}", opts.url);
    println!();

    let opts = Arc::new(opts);
    let stats = Arc::new(Mutex::new(Stats::default()));
    let start = Instant::now();

    let workers: Vec<_> = (0..opts.servers)
        .map(|id| tokio::spawn(server_worker(id, opts.clone(), stats.clone())))
        .collect();
    futures::future::join_all(workers).await;

    let elapsed = start.elapsed();
    let stats = Arc::try_unwrap(stats)
        .map_err(|_| anyhow::anyhow!("load workers still hold the stats handle"))?
        .into_inner()
        .expect("stats lock");
    report(&opts, &stats, elapsed);
    Ok(())
}

fn report(opts: &LoadgenOpts, stats: &Stats, elapsed: Duration) {
    println!();
    println!("{}", "=".repeat(60));
    println!("LOAD TEST RESULTS");
    println!("{}", "=".repeat(60));
    println!("Total time: {:.2}s", elapsed.as_secs_f64());
    println!("Successful requests: {}", stats.success);
    println!("Failed requests: {}", stats.errors);
    println!("Total requests: {}", stats.success + stats.errors);
    println!();

    if !stats.latencies.is_empty() {
        let mut sorted = stats.latencies.clone();
        sorted.sort();
        let mean = sorted.iter().sum::<Duration>() / sorted.len() as u32;
        println!("Latency stats:");
        println!("  Min: {:.2}ms", sorted[0].as_secs_f64() * 1000.0);
        println!(
            "  Max: {:.2}ms",
            sorted[sorted.len() - 1].as_secs_f64() * 1000.0
        );
        println!("  Mean: {:.2}ms", mean.as_secs_f64() * 1000.0);
        println!("  p50: {:.2}ms", percentile(&sorted, 0.50).as_secs_f64() * 1000.0);
        println!("  p95: {:.2}ms", percentile(&sorted, 0.95).as_secs_f64() * 1000.0);
        println!("  p99: {:.2}ms", percentile(&sorted, 0.99).as_secs_f64() * 1000.0);
    }

    let total_metrics = stats.success * opts.metrics_per_batch as u64;
    println!();
    println!("Throughput:");
    println!(
        "  {:.2} requests/sec",
        stats.success as f64 / elapsed.as_secs_f64()
    );
    println!(
        "  {:.2} metrics/sec",
        total_metrics as f64 / elapsed.as_secs_f64()
    );
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}
