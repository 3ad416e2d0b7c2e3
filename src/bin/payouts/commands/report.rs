//! Report command - fetch findings and compute the payout report

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use contest_payouts::cantina::CantinaClient;
use contest_payouts::config::Config;
use contest_payouts::payout::{compute_payouts, ContestOutcome, ContestReport};
use contest_payouts::scoring::PointsTable;

use crate::style::*;

pub async fn run(
    config_path: &Path,
    repository: Option<String>,
    pool: Option<f64>,
    limit: Option<u32>,
) -> Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(repository) = repository {
        config.provider.repository = repository;
    }
    if let Some(pool) = pool {
        config.payouts.prize_pool = pool;
    }
    if let Some(limit) = limit {
        config.provider.fetch_limit = limit;
    }
    config.validate()?;

    let pool = config.payouts.prize_pool;
    if pool <= 0.0 {
        print_warning("prize pool is zero or negative - every payout will be $0.00");
    }

    println!("Repository:  {}", style_cyan(&config.provider.repository));
    println!("Prize pool:  {}", style_bold(&format_usd(pool)));
    println!("Generated:   {}", style_dim(&Utc::now().format("%Y-%m-%d %H:%M UTC").to_string()));
    println!();

    let points = PointsTable::new(config.payouts.base_points.clone());
    let cookie = config
        .auth_cookie()
        .context("auth cookie disappeared after validation")?;
    let client = CantinaClient::new(
        &config.provider.base_url,
        &cookie,
        Duration::from_secs(config.provider.timeout_secs),
    );

    let spinner = fetch_spinner("Fetching findings...");
    let fetched = client
        .fetch_findings(
            &config.provider.repository,
            &points.payable_severities(),
            config.provider.fetch_limit,
        )
        .await;
    spinner.finish_and_clear();

    let raw = fetched.context("failed to fetch findings")?;
    print_info(&format!("Processing {} raw finding entries", raw.len()));

    match compute_payouts(raw, &points, pool) {
        ContestOutcome::NoConfirmedFindings => {
            print_info("No confirmed findings in the dataset - nothing to pay out.");
        }
        ContestOutcome::NoValidSubmissions => {
            print_info("No valid submissions with payable severity - nothing to pay out.");
        }
        ContestOutcome::Report(report) => render_report(&report),
    }

    Ok(())
}

fn fetch_spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn render_report(report: &ContestReport) {
    print_header("Points per Vulnerability");

    for award in &report.awards {
        println!();
        println!("{}", style_bold(&award.title));
        println!(
            "  Severity:           {} (base {} pts)",
            style_severity(&award.severity),
            award.base_points
        );
        println!("  Unique submitters:  {}", award.submitter_count);
        println!(
            "  Points each:        {:.4}",
            award.points_per_submitter
        );
        println!("  Submitters:         {}", award.submitters.join(", "));
    }

    let payouts = &report.payouts;
    if payouts.total_points <= 0.0 {
        println!();
        print_info("No points awarded across all users - no payouts to distribute.");
        return;
    }

    print_header("Payout Summary");
    println!();
    println!("Total points awarded:  {:.4}", payouts.total_points);
    println!(
        "Payout per point:      {}",
        format_usd(payouts.payout_per_point)
    );
    println!();

    println!(
        "{:<24}  {:>14}  {:>16}",
        "Username", "Total Points", "Payout"
    );
    println!("{}", "─".repeat(58));
    for row in &payouts.rows {
        println!(
            "{:<24}  {:>14.4}  {:>16}",
            row.username,
            row.points,
            format_usd(row.amount)
        );
    }
    println!("{}", "─".repeat(58));
    println!(
        "{:<24}  {:>14.4}  {:>16}",
        "TOTALS",
        payouts.total_points,
        format_usd(payouts.total_payout)
    );
    println!();

    if payouts.pool > 0.0 {
        if payouts.reconciles() {
            print_success(&format!(
                "Total payout matches the {} prize pool",
                format_usd(payouts.pool)
            ));
        } else {
            print_info(&format!(
                "Total payout {} differs slightly from the {} pool due to rounding",
                format_usd(payouts.total_payout),
                format_usd(payouts.pool)
            ));
        }
    }
}
