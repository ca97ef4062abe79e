//! CLI entry point for recon.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use recon_core::{PortSpec, TargetDomain};
use recon_discover::config::{load_config, ReconConfig, ReportFormat};
use recon_discover::error::DiscoverError;
use recon_discover::pipeline::{run_until_interrupted, ReconPipeline};
use recon_discover::{report, wordlist};

#[derive(Parser)]
#[command(name = "recon")]
#[command(about = "Subdomain brute force and port enumeration for a single domain")]
struct Cli {
    /// Target URL or domain.
    #[arg(short, long)]
    target: String,

    /// File to save results to (printed to stdout otherwise).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ports to scan (comma-separated, ranges allowed).
    #[arg(short, long)]
    ports: Option<PortSpec>,

    /// Number of concurrent DNS lookups.
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Number of targets scanned at once.
    #[arg(long)]
    scan_concurrency: Option<usize>,

    /// Wordlist file, one label per line.
    #[arg(short, long)]
    wordlist: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Path to the nmap binary.
    #[arg(long)]
    nmap_path: Option<String>,

    /// Config file prefix (default: recon).
    #[arg(short, long, default_value = "recon")]
    config: String,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    match run_until_interrupted(run(cli), interrupt).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(report_failure(&e, &mut std::io::stderr())),
    }
}

/// Print a fatal error once and return the exit code for it.
fn report_failure(e: &anyhow::Error, out: &mut impl Write) -> u8 {
    let message = match e.downcast_ref::<DiscoverError>() {
        Some(DiscoverError::Interrupted) => "[!] Scan interrupted by user".to_string(),
        _ => format!("[!] Error: {e:#}"),
    };
    // Nothing left to report to if stderr is gone.
    let _ = writeln!(out, "{message}");

    e.downcast_ref::<DiscoverError>()
        .map_or(1, DiscoverError::exit_code)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = apply_overrides(load_config(&cli.config)?, &cli);
    let domain = TargetDomain::parse(&cli.target)?;

    tracing::info!(target = %domain.host, base_domain = %domain.base, "Starting reconnaissance");

    let labels = match &config.wordlist {
        Some(path) => wordlist::load_wordlist(Path::new(path))
            .with_context(|| format!("Failed to read wordlist {path}"))?,
        None => wordlist::default_wordlist(),
    };

    let pipeline = ReconPipeline::from_config(&config).await?;
    let result = pipeline.run(&domain, &labels).await;

    match &cli.output {
        Some(path) => report::write_report(&result, path, config.format)
            .with_context(|| format!("Failed to save results to {}", path.display()))?,
        None => print!("{}", report::render(&result, config.format)?),
    }

    Ok(())
}

fn apply_overrides(mut config: ReconConfig, cli: &Cli) -> ReconConfig {
    if let Some(ports) = &cli.ports {
        config.ports = ports.clone();
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(n) = cli.scan_concurrency {
        config.scan_concurrency = n;
    }
    if let Some(path) = &cli.wordlist {
        config.wordlist = Some(path.display().to_string());
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(path) = &cli.nmap_path {
        config.nmap_path = path.clone();
    }
    config
}
