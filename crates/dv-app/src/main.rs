//! Heatmap demo entry point
//!
//! Usage: `heatmap-demo [traces.json] [config.json]`
//!
//! Without arguments the bundled sample traces are used. Set `RUST_LOG` to
//! change verbosity (defaults to `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use dv_core::AdapterConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let traces_path = args.next();
    let config_path = args.next();

    let traces_json = match &traces_path {
        Some(path) => {
            info!("Loading traces from {:?}", path);
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
        }
        None => {
            info!("No trace file given, using bundled sample traces");
            demo::SAMPLE_TRACES.to_string()
        }
    };

    let config = match &config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
            AdapterConfig::from_json_str(&json).with_context(|| format!("Invalid adapter config in {:?}", path))?
        }
        None => AdapterConfig::default(),
    };

    let traces = demo::parse_traces(&traces_json)?;
    let report = demo::run(&traces, config)?;

    info!(
        "Rendered {} traces ({} failed), resolved {} picks",
        report.traces,
        report.failures,
        report.picks.len()
    );
    Ok(())
}
