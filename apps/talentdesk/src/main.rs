use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use talentdesk::config::Config;
use talentdesk::kv::FileBackend;
use talentdesk::relations::{chart_data, dashboard_summary, status_histogram};
use talentdesk::seed::seed_sample_candidates;
use talentdesk::DeskState;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting TalentDesk v{}", env!("CARGO_PKG_VERSION"));

    let backend = FileBackend::open(&config.store_path)
        .with_context(|| format!("Failed to open store {}", config.store_path.display()))?;
    let state = DeskState::new(Arc::new(backend));

    if let Some(job_id) = &config.seed_job {
        seed_sample_candidates(&state, job_id)?;
    }

    let histogram: serde_json::Map<String, serde_json::Value> = status_histogram(&state, None)?
        .into_iter()
        .map(|(status, count)| (status.label().to_string(), json!(count)))
        .collect();

    let report = json!({
        "summary": dashboard_summary(&state)?,
        "jobs": chart_data(&state)?,
        "statuses": histogram,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
