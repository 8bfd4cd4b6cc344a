//! txburst - send N transactions in parallel and report how each one went.
//!
//! The engine lives in `txburst-core`; this binary collects configuration,
//! prints progress while the run is in flight and renders the final report.

mod networks;
mod report;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use txburst_core::config::{Credentials, resolve_endpoint};
use txburst_core::impls::{
    SerializedClient, SimulatedClient, SimulatedConnector, SimulationConfig, StaticConnector,
};
use txburst_core::ports::Connector;
use txburst_core::{ResultSet, RunCoordinator, RunRequest};

/// Send N transactions to one address in parallel and time each of them
#[derive(Parser, Debug)]
#[command(name = "txburst")]
#[command(about = "Parallel transaction tester", long_about = None)]
struct Cli {
    /// Target address (0x + 40 hex digits, EIP-55 checksum if mixed case)
    #[arg(short, long, required_unless_present = "list_networks")]
    target: Option<String>,

    /// Number of transactions to send
    #[arg(short = 'n', long, default_value_t = 5, allow_negative_numbers = true)]
    count: i64,

    /// Chain id of the network (see --list-networks)
    #[arg(long)]
    chain_id: Option<u64>,

    /// RPC URL override (defaults to TXBURST_RPC_URL, then the network's endpoint)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Project access key (defaults to TXBURST_PROJECT_ACCESS_KEY)
    #[arg(long)]
    project_access_key: Option<String>,

    /// Private key of the sending account (defaults to TXBURST_PRIVATE_KEY)
    #[arg(long)]
    private_key: Option<String>,

    /// Send one transaction at a time; finality waits still overlap
    #[arg(long)]
    serialize_submits: bool,

    /// Simulated submit latency range in ms, as MIN..MAX
    #[arg(long, default_value = "50..250", value_parser = parse_range)]
    submit_latency: std::ops::Range<u64>,

    /// Simulated finality latency range in ms, as MIN..MAX
    #[arg(long, default_value = "500..2500", value_parser = parse_range)]
    finality_latency: std::ops::Range<u64>,

    /// Probability that a simulated submit fails
    #[arg(long, default_value_t = 0.0, value_parser = parse_rate)]
    submit_failure_rate: f64,

    /// Probability that a simulated finality wait fails
    #[arg(long, default_value_t = 0.0, value_parser = parse_rate)]
    finality_failure_rate: f64,

    /// Progress log interval in ms
    #[arg(long, default_value_t = 500)]
    progress_ms: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the built-in networks and exit
    #[arg(long)]
    list_networks: bool,
}

fn parse_range(s: &str) -> Result<std::ops::Range<u64>, String> {
    let (min, max) = s
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got {s:?}"))?;
    let min: u64 = min.trim().parse().map_err(|e| format!("{min:?}: {e}"))?;
    let max: u64 = max.trim().parse().map_err(|e| format!("{max:?}: {e}"))?;
    if max < min {
        return Err(format!("empty range {s:?}"));
    }
    Ok(min..max)
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{s:?}: {e}"))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("{rate} is not between 0 and 1"));
    }
    Ok(rate)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("txburst=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.list_networks {
        print!("{}", networks::render_catalog());
        return Ok(());
    }
    let Some(target) = cli.target.clone() else {
        bail!("--target is required");
    };

    let network = match cli.chain_id {
        Some(chain_id) => match networks::find(chain_id) {
            Some(network) => network,
            None => bail!("unknown chain id {chain_id}"),
        },
        None => networks::default_network(),
    };
    let endpoint =
        resolve_endpoint(cli.rpc_url.clone()).unwrap_or_else(|| network.rpc_url.to_string());
    info!(chain_id = network.chain_id, network = network.name, %endpoint, "network selected");

    let simulation = SimulationConfig {
        submit_latency_ms: cli.submit_latency.clone(),
        finality_latency_ms: cli.finality_latency.clone(),
        submit_failure_rate: cli.submit_failure_rate,
        finality_failure_rate: cli.finality_failure_rate,
    };
    let connector: Arc<dyn Connector> = if cli.serialize_submits {
        Arc::new(StaticConnector::new(Arc::new(SerializedClient::new(
            SimulatedClient::new(simulation),
        ))))
    } else {
        Arc::new(SimulatedConnector::new(simulation))
    };

    let coordinator = RunCoordinator::new(connector);
    let credentials =
        Credentials::new(cli.project_access_key.clone(), cli.private_key.clone())
            .or(Credentials::from_env());
    let request = RunRequest::new(target, cli.count, credentials)
        .with_chain_id(network.chain_id)
        .with_endpoint(Some(endpoint));

    let results = coordinator.results();
    let run = coordinator.start_run(request);
    tokio::pin!(run);
    let mut ticker = tokio::time::interval(Duration::from_millis(cli.progress_ms.max(1)));
    ticker.tick().await;
    let summary = loop {
        tokio::select! {
            outcome = &mut run => break outcome.context("run not started")?,
            _ = ticker.tick() => log_progress(&results),
        }
    };

    let records = coordinator.snapshot();
    if cli.json {
        println!("{}", report::render_json(&summary, &records, network)?);
    } else {
        print!("{}", report::render_table(&records));
        let links = report::render_links(&records, network);
        if !links.is_empty() {
            println!("\nExplorer:");
            print!("{links}");
        }
        println!(
            "\n{}: {} sent, {} succeeded, {} failed in {} ms",
            summary.run_id,
            summary.count,
            summary.succeeded,
            summary.failed,
            (summary.ended_at - summary.started_at).num_milliseconds()
        );
    }
    Ok(())
}

fn log_progress(results: &ResultSet) {
    let snapshot = results.snapshot();
    let finished = snapshot.iter().filter(|r| r.is_terminal()).count();
    info!(
        finished,
        in_flight = snapshot.len() - finished,
        total = results.capacity(),
        "progress"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_negative_count_for_the_engine_to_reject() {
        let cli = Cli::try_parse_from(["txburst", "--target", "0x00", "-n", "-1"]).unwrap();
        assert_eq!(cli.count, -1);
    }

    #[test]
    fn target_is_required_unless_listing_networks() {
        assert!(Cli::try_parse_from(["txburst", "-n", "3"]).is_err());

        let cli = Cli::try_parse_from(["txburst", "--list-networks"]).unwrap();
        assert!(cli.list_networks);
        assert_eq!(cli.target, None);
    }

    #[test]
    fn ranges_and_rates_are_validated() {
        assert_eq!(parse_range("10..20").unwrap(), 10..20);
        assert!(parse_range("20..10").is_err());
        assert!(parse_range("abc").is_err());
        assert_eq!(parse_rate("0.25").unwrap(), 0.25);
        assert!(parse_rate("1.5").is_err());
    }
}
