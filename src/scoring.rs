//! Point allocation
//!
//! Splits each vulnerability's base point value across everyone who
//! independently reported it and accumulates per-user point totals.

use std::collections::{BTreeMap, HashMap};

use tracing::error;

use crate::findings::ConfirmedVulnerability;
use crate::grouping::ValidSubmission;

pub const DEFAULT_HIGH_POINTS: f64 = 10.0;
pub const DEFAULT_MEDIUM_POINTS: f64 = 3.0;

/// Decay factor applied once per additional independent submitter.
const CROWDING_FACTOR: f64 = 0.9;

/// Severity tier → base point value policy table.
///
/// Severities outside the table are not payable.
#[derive(Debug, Clone)]
pub struct PointsTable {
    base_points: BTreeMap<String, f64>,
}

impl PointsTable {
    pub fn new(base_points: BTreeMap<String, f64>) -> Self {
        Self { base_points }
    }

    pub fn base_points(&self, severity: &str) -> Option<f64> {
        self.base_points.get(severity).copied()
    }

    pub fn is_payable(&self, severity: &str) -> bool {
        self.base_points.contains_key(severity)
    }

    /// Payable severity names in stable order, for the provider's severity
    /// filter parameter.
    pub fn payable_severities(&self) -> Vec<&str> {
        self.base_points.keys().map(String::as_str).collect()
    }
}

impl Default for PointsTable {
    fn default() -> Self {
        let mut base_points = BTreeMap::new();
        base_points.insert("high".to_string(), DEFAULT_HIGH_POINTS);
        base_points.insert("medium".to_string(), DEFAULT_MEDIUM_POINTS);
        Self { base_points }
    }
}

/// Per-submitter point credit for a vulnerability reported by `submitters`
/// independent users.
///
/// The single finder of a vulnerability keeps the full base value. Shared
/// findings decay geometrically and split evenly, so the total paid for a
/// heavily-duplicated vulnerability shrinks as the crowd grows. The exact
/// shape is a payout policy commitment - do not change it.
pub fn scaled_points(base_points: f64, submitters: usize) -> f64 {
    match submitters {
        0 => 0.0,
        1 => base_points,
        n => base_points * CROWDING_FACTOR.powi(n as i32 - 1) / n as f64,
    }
}

/// Reporting record retained per vulnerability.
#[derive(Debug, Clone)]
pub struct VulnerabilityAward {
    pub vulnerability_id: String,
    pub title: String,
    pub severity: String,
    pub submitter_count: usize,
    pub base_points: f64,
    pub points_per_submitter: f64,
    /// Submitter display names, sorted.
    pub submitters: Vec<String>,
}

/// Accumulated output of the allocation stage.
#[derive(Debug, Default)]
pub struct PointAllocation {
    /// Running point total per user id.
    pub user_points: HashMap<String, f64>,
    /// Display name per user id, first occurrence wins.
    pub user_names: HashMap<String, String>,
    /// Per-vulnerability award records, sorted by title.
    pub awards: Vec<VulnerabilityAward>,
}

impl PointAllocation {
    pub fn total_points(&self) -> f64 {
        self.user_points.values().sum()
    }
}

/// Convert each vulnerability's submission list into per-user point credits.
///
/// Uniqueness is by user id: a user is credited exactly once per
/// vulnerability no matter how many records they filed for it.
pub fn allocate_points(
    submissions: &BTreeMap<String, Vec<ValidSubmission>>,
    confirmed: &HashMap<String, ConfirmedVulnerability>,
    points: &PointsTable,
) -> PointAllocation {
    let mut allocation = PointAllocation::default();

    for (vulnerability_id, subs) in submissions {
        let Some(first) = subs.first() else {
            continue;
        };
        let severity = first.severity.as_str();
        let Some(base_points) = points.base_points(severity) else {
            // unreachable given upstream filtering
            error!(
                "cannot resolve base points for vulnerability {vulnerability_id} \
                 (severity '{severity}'), skipping"
            );
            continue;
        };

        let mut unique: BTreeMap<&str, &str> = BTreeMap::new();
        for sub in subs {
            unique
                .entry(sub.user_id.as_str())
                .or_insert(sub.username.as_str());
        }

        let submitter_count = unique.len();
        let points_each = scaled_points(base_points, submitter_count);

        let mut names = Vec::with_capacity(submitter_count);
        for (user_id, username) in &unique {
            *allocation
                .user_points
                .entry(user_id.to_string())
                .or_insert(0.0) += points_each;
            allocation
                .user_names
                .entry(user_id.to_string())
                .or_insert_with(|| username.to_string());
            names.push(username.to_string());
        }
        names.sort();

        let original = confirmed.get(vulnerability_id);
        allocation.awards.push(VulnerabilityAward {
            vulnerability_id: vulnerability_id.clone(),
            title: original
                .and_then(|o| o.title.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            severity: severity.to_string(),
            submitter_count,
            base_points,
            points_per_submitter: points_each,
            submitters: names,
        });
    }

    allocation.awards.sort_by(|a, b| a.title.cmp(&b.title));
    allocation
}
