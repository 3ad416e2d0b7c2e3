//! Check command - validate configuration and probe the provider

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use contest_payouts::cantina::CantinaClient;
use contest_payouts::config::Config;
use contest_payouts::scoring::PointsTable;

use crate::style::*;

pub async fn run(config_path: &Path) -> Result<()> {
    print_header("Configuration Check");
    println!();

    let config = Config::load_from(config_path)?;
    config.validate()?;

    print_success("Configuration is valid");
    println!("  Repository:  {}", style_cyan(&config.provider.repository));

    if config.payouts.prize_pool <= 0.0 {
        print_warning("prize pool is zero or negative - reports will pay $0.00");
    }

    print_info("Probing findings provider...");

    let points = PointsTable::new(config.payouts.base_points.clone());
    let cookie = config.auth_cookie().unwrap_or_default();
    let client = CantinaClient::new(
        &config.provider.base_url,
        &cookie,
        Duration::from_secs(config.provider.timeout_secs),
    );

    // A single-finding fetch is enough to prove connectivity and that the
    // credential is accepted.
    let raw = client
        .fetch_findings(&config.provider.repository, &points.payable_severities(), 1)
        .await
        .context("provider probe failed")?;

    print_success(&format!(
        "Provider reachable, credential accepted ({} finding{} visible)",
        raw.len(),
        if raw.len() == 1 { "" } else { "s" }
    ));

    Ok(())
}
