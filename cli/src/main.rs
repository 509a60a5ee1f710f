//! netcap: key generation, collector, container forwarding and counting.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use netcap_core::collector::Collector;
use netcap_core::config::{CollectorConfig, SensorConfig};
use netcap_core::container::count_records;
use netcap_core::crypto::{load_public, KeyPair};
use netcap_core::sensor::{forward_container, BatchSink};
use netcap_core::telemetry::{TelemetrySnapshot, TelemetryTimer, TransportCounters};
use netcap_core::transport::TransportSender;
use netcap_core::utils::{format_bytes, install_shutdown_handler};

#[derive(Parser)]
#[command(name = "netcap")]
#[command(version)]
#[command(about = "Audit-record containers and encrypted sensor/collector transport")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an X25519 key pair as pub.key / priv.key.
    Keygen {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Receive batches and write one container per client and record type.
    Collect {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        addr: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        priv_key: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Replay local containers to a collector.
    Forward {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        addr: Option<String>,
        #[arg(long)]
        server_pub_key: Option<PathBuf>,
        #[arg(long)]
        priv_key: Option<PathBuf>,
        #[arg(long)]
        client_id: Option<String>,
        #[arg(long)]
        max_batch_size: Option<usize>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Count the records in a container.
    Count { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Keygen { out } => keygen(&out),
        Command::Collect { config, addr, out, priv_key, workers } => {
            collect(config.as_deref(), addr, out, priv_key, workers)
        }
        Command::Forward { config, addr, server_pub_key, priv_key, client_id, max_batch_size, files } => {
            let overrides = SensorOverrides { addr, server_pub_key, priv_key, client_id, max_batch_size };
            forward(config.as_deref(), overrides, &files)
        }
        Command::Count { file } => count(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn keygen(out: &Path) -> Result<()> {
    let pair = KeyPair::generate();
    let (pub_path, priv_path) = pair.write_hex(out).context("writing key pair")?;
    info!("wrote {} and {}", pub_path.display(), priv_path.display());
    Ok(())
}

fn count(file: &Path) -> Result<()> {
    let n = count_records(file).with_context(|| format!("counting {}", file.display()))?;
    println!("{}: {} records", file.display(), n);
    Ok(())
}

fn collect(
    config: Option<&Path>,
    addr: Option<String>,
    out: Option<PathBuf>,
    priv_key: Option<PathBuf>,
    workers: Option<usize>,
) -> Result<()> {
    let mut cfg = match config {
        Some(p) => CollectorConfig::from_file(p)?,
        None => CollectorConfig::default(),
    };
    if let Some(a) = addr {
        cfg.listen_addr = a;
    }
    if let Some(o) = out {
        cfg.out_dir = o;
    }
    if let Some(k) = priv_key {
        cfg.priv_key = k;
    }
    if let Some(w) = workers {
        cfg.workers = w;
    }
    cfg.validate()?;

    let keys = KeyPair::load_private(&cfg.priv_key).context("loading collector private key")?;
    let running = install_shutdown_handler()?;
    let collector = Collector::bind(&cfg, keys).context("starting collector")?;
    info!("collector ready on {}, writing to {}", collector.local_addr()?, cfg.out_dir.display());

    let report = collector.run(&running);
    info!(
        "received {} datagrams ({}), appended {} records",
        report.telemetry.counters.datagrams_received,
        format_bytes(report.telemetry.counters.bytes_received),
        report.telemetry.counters.frames_appended
    );
    if !report.close.is_ok() {
        bail!("{} containers failed to close", report.close.failed.len());
    }
    Ok(())
}

struct SensorOverrides {
    addr: Option<String>,
    server_pub_key: Option<PathBuf>,
    priv_key: Option<PathBuf>,
    client_id: Option<String>,
    max_batch_size: Option<usize>,
}

fn forward(config: Option<&Path>, o: SensorOverrides, files: &[PathBuf]) -> Result<()> {
    let mut cfg = match config {
        Some(p) => SensorConfig::from_file(p)?,
        None => SensorConfig::default(),
    };
    if let Some(a) = o.addr {
        cfg.collector_addr = a;
    }
    if let Some(k) = o.server_pub_key {
        cfg.collector_pub_key = k;
    }
    if o.priv_key.is_some() {
        cfg.priv_key = o.priv_key;
    }
    if let Some(c) = o.client_id {
        cfg.client_id = c;
    }
    if let Some(m) = o.max_batch_size {
        cfg.max_batch_size = m;
    }
    cfg.validate()?;

    let keys = match &cfg.priv_key {
        Some(p) => KeyPair::load_private(p).context("loading sensor private key")?,
        None => {
            info!("no sensor key configured, using an ephemeral key pair");
            KeyPair::generate()
        }
    };
    let collector_pub = load_public(&cfg.collector_pub_key).context("loading collector public key")?;
    let sender = TransportSender::connect(&cfg.collector_addr, keys, collector_pub)?;
    let sink: Arc<dyn BatchSink> = Arc::new(sender);
    let running = install_shutdown_handler()?;

    let mut timer = TelemetryTimer::start();
    let mut totals = TransportCounters::default();
    for file in files {
        if !running.load(Ordering::SeqCst) {
            warn!("interrupted, skipping remaining files");
            break;
        }
        let summary = forward_container(file, &cfg.batcher(), cfg.channel_capacity, Arc::clone(&sink), &running)
            .with_context(|| format!("forwarding {}", file.display()))?;
        totals += summary.counters;
    }
    timer.stop();

    let snapshot = TelemetrySnapshot::from(&totals, &timer, 0);
    info!(
        "sent {} batches ({}), {} send failures",
        totals.batches_sent,
        format_bytes(totals.bytes_sent),
        totals.send_failures
    );
    info!("telemetry {}", snapshot.to_json());
    Ok(())
}
