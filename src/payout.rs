//! Payout conversion
//!
//! Converts accumulated points into a proportional share of the fixed
//! prize pool, and composes the full allocation pipeline over a raw
//! findings collection.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::info;

use crate::findings;
use crate::grouping;
use crate::scoring::{self, PointAllocation, PointsTable, VulnerabilityAward};

/// Relative tolerance for the payout-vs-pool reconciliation check.
/// Floating-point drift inside this band is expected, not a fault.
pub const RECONCILE_REL_TOLERANCE: f64 = 1e-4;

/// One user's line in the payout table.
#[derive(Debug, Clone)]
pub struct PayoutRow {
    pub username: String,
    pub points: f64,
    pub amount: f64,
}

/// The per-user payout table with its totals.
#[derive(Debug, Clone)]
pub struct PayoutTable {
    /// Rows sorted by payout descending, username as tie-break.
    pub rows: Vec<PayoutRow>,
    pub pool: f64,
    pub total_points: f64,
    pub payout_per_point: f64,
    pub total_payout: f64,
}

impl PayoutTable {
    /// Whether the summed payouts and the configured pool agree within
    /// floating-point tolerance.
    pub fn reconciles(&self) -> bool {
        relative_eq(self.total_payout, self.pool)
    }
}

fn relative_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= RECONCILE_REL_TOLERANCE * scale
}

/// Distribute the prize pool proportionally to accumulated points.
///
/// With zero total points the table is empty (the caller reports the zero
/// state explicitly). A non-positive pool yields all-zero payouts rather
/// than zero or negative amounts per user.
pub fn distribute_pool(allocation: &PointAllocation, pool: f64) -> PayoutTable {
    let total_points = allocation.total_points();
    let payout_per_point = if total_points > 0.0 && pool > 0.0 {
        pool / total_points
    } else {
        0.0
    };

    let mut rows = Vec::new();
    if total_points > 0.0 {
        for (user_id, points) in &allocation.user_points {
            let username = allocation
                .user_names
                .get(user_id)
                .cloned()
                .unwrap_or_else(|| format!("ID:{user_id}"));
            rows.push(PayoutRow {
                username,
                points: *points,
                amount: *points * payout_per_point,
            });
        }
        rows.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.username.cmp(&b.username))
        });
    }

    let total_payout = rows.iter().map(|row| row.amount).sum();
    PayoutTable {
        rows,
        pool,
        total_points,
        payout_per_point,
        total_payout,
    }
}

/// Everything the report renderer needs for one contest run.
#[derive(Debug)]
pub struct ContestReport {
    /// Per-vulnerability award records, sorted by title.
    pub awards: Vec<VulnerabilityAward>,
    pub payouts: PayoutTable,
}

/// Outcome of running the allocation pipeline over a raw findings
/// collection. The empty outcomes are expected states, not errors.
#[derive(Debug)]
pub enum ContestOutcome {
    /// The dataset holds no confirmed findings at all.
    NoConfirmedFindings,
    /// Confirmed findings exist but none yielded a payable submission.
    NoValidSubmissions,
    Report(ContestReport),
}

/// Run the full pipeline: classify → group → allocate → convert.
///
/// Identical input always produces identical payouts.
pub fn compute_payouts(raw: Vec<Value>, points: &PointsTable, pool: f64) -> ContestOutcome {
    let findings = findings::decode_findings(raw);
    let confirmed = findings::confirmed_index(&findings);
    if confirmed.is_empty() {
        return ContestOutcome::NoConfirmedFindings;
    }
    info!("found {} unique confirmed findings", confirmed.len());

    let submissions = grouping::group_submissions(&findings, &confirmed, points);
    if submissions.is_empty() {
        return ContestOutcome::NoValidSubmissions;
    }
    info!(
        "calculating points for {} unique confirmed vulnerabilities",
        submissions.len()
    );

    let allocation = scoring::allocate_points(&submissions, &confirmed, points);
    let payouts = distribute_pool(&allocation, pool);
    ContestOutcome::Report(ContestReport {
        awards: allocation.awards,
        payouts,
    })
}
