//! Config command - show the resolved configuration

use std::path::Path;

use anyhow::Result;

use contest_payouts::config::{Config, AUTH_COOKIE_ENV};

use crate::style::*;

pub fn run(config_path: &Path) -> Result<()> {
    print_header("Resolved Configuration");

    let config = Config::load_from(config_path)?;

    println!();
    println!(
        "Repository:   {}",
        if config.provider.repository.trim().is_empty() {
            style_yellow("<not set>")
        } else {
            style_cyan(&config.provider.repository)
        }
    );
    println!("Provider:     {}", config.provider.base_url);
    println!("Fetch limit:  {}", config.provider.fetch_limit);
    println!("Timeout:      {}s", config.provider.timeout_secs);
    println!(
        "Auth cookie:  {}",
        match config.auth_cookie() {
            Some(cookie) => mask_cookie(&cookie),
            None => style_yellow(&format!("<not set - export {AUTH_COOKIE_ENV}>")),
        }
    );
    println!("Prize pool:   {}", format_usd(config.payouts.prize_pool));

    println!();
    println!("Base points by severity:");
    for (severity, points) in &config.payouts.base_points {
        println!("  {:<10}  {:>6.1} pts", severity, points);
    }

    Ok(())
}
