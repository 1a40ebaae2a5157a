//! `xcore-stub`: answer XCore control commands on a serial device.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xcore_protocol::Responder;
use xcore_stub::{describe_metrics, open_port, run, Cli, MetricsObserver, SerialConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    describe_metrics();

    let config = SerialConfig::default();
    let mut port = match open_port(&cli.device, &config) {
        Ok(port) => port,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(device = %cli.device, baud = config.baud_rate, "port open");

    let mut responder = Responder::new();
    let mut observer = MetricsObserver::new();

    tokio::select! {
        exit = run(&mut port, &mut responder, &mut observer) => {
            tracing::info!(?exit, "no longer reading; press Ctrl-C to quit");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot wait for Ctrl-C");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
        }
    }

    let stats = observer.stats();
    tracing::info!(
        answered = stats.answered,
        reply_failed = stats.reply_failed,
        checksum_mismatch = stats.checksum_mismatch,
        unrecognized = stats.unrecognized,
        overflow = stats.overflow,
        "shutting down"
    );
    ExitCode::SUCCESS
}
