//! Box office terminal.
//!
//! # Usage
//!
//! ```bash
//! BOX_OFFICE_PRIORITY_CAPACITY=50 BOX_OFFICE_STANDARD_CAPACITY=100 cargo run --bin box-office
//! ```

use anyhow::Context;
use box_office_cli::{Config, Session};
use box_office_core::metrics::register_metrics;
use box_office_core::{AllocationEngine, AllocationEnvironment, SystemClock};
use box_office_csv::CsvTransactionLog;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they never interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "box_office=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        priority = config.tickets.priority_capacity,
        standard = config.tickets.standard_capacity,
        log_path = %config.log_path.display(),
        "Configuration loaded"
    );

    if let Some(addr) = config.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("failed to install Prometheus exporter")?;
        info!("Prometheus metrics available at http://{addr}/metrics");
    }
    register_metrics();

    let log = CsvTransactionLog::new(&config.log_path);
    let env = AllocationEnvironment::new(Arc::new(SystemClock), Arc::new(log));
    let engine = AllocationEngine::new(config.initial_capacity(), env).with_context(|| {
        format!(
            "cannot initialize transaction log at {}",
            config.log_path.display()
        )
    })?;
    info!(
        total = engine.initial_capacity().total(),
        "Box office open"
    );

    let mut session = Session::new(engine, &config, io::stdin().lock(), io::stdout().lock());
    session.run().context("terminal I/O failed")?;

    Ok(())
}
