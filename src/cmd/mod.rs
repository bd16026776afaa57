use std::time::Instant;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::api::ApiClient;
use crate::checks::run_suite;
use crate::config::{load_config_from_path, ProbeConfig};
use crate::errors::{ProbeError, Result};
use crate::http::middleware::build_logging_client;
use crate::http::Http;

/// CLI
#[derive(Parser, Debug)]
#[command(
    name = "swapiprobe",
    version,
    about = "Probe a Star Wars reference API for conformance.",
    long_about = "Probe a Star Wars reference API for conformance.\n\
Runs pagination, search, schema and cross-reference checks against a live deployment.\n\n\
Resources:\n  • Expectations: known totals, ID bounds and search fixtures (YAML, all optional)\n  • Checks: listing shape, next-chain traversal, schema conformance, people ↔ films symmetry\n  • Exit: non-zero when any check fails"
)]
pub struct Cli {
    /// API origin plus prefix, e.g. https://swapi.co/api
    #[arg(long = "base-url", short = 'u', value_name = "URL")]
    pub base_url: Option<String>,

    /// Expectations file; defaults describe the public deployment
    #[arg(long = "yaml-config", short = 'y', value_name = "FILE")]
    pub yaml_config: Option<String>,

    /// Override the per-check request cap
    #[arg(long = "request-threshold", short = 't', value_name = "N")]
    pub request_threshold: Option<usize>,
}

#[instrument(skip_all)]
pub async fn run_probe(cli: Cli) -> Result<()> {
    info!("starting swapiprobe run");

    let t0 = Instant::now();

    let mut cfg = match &cli.yaml_config {
        Some(path) => load_config_from_path(path)?,
        None => ProbeConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        cfg.base_url = base_url;
    }
    if let Some(threshold) = cli.request_threshold {
        cfg.expectations.request_threshold = threshold;
    }
    if cfg.expectations.request_threshold == 0 {
        return Err(ProbeError::Config(
            "request_threshold must be at least 1".to_string(),
        ));
    }
    debug!(base_url = %cfg.base_url, threshold = cfg.expectations.request_threshold, "resolved config");

    let http = Http::new().header("accept", "application/json");
    let client = build_logging_client(http.build_client());
    let api = ApiClient::new(client, &cfg.base_url)?;

    let report = run_suite(&api, &cfg.expectations).await?;

    info!(
        passed = report.passed(),
        failed = report.failed(),
        total = report.total(),
        total_ms = t0.elapsed().as_millis() as u64,
        "probe finished"
    );

    if report.is_success() {
        Ok(())
    } else {
        Err(ProbeError::SuiteFailed {
            failed: report.failed(),
            total: report.total(),
        })
    }
}
