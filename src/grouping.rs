//! Submission grouping
//!
//! Decides which finding records yield a payable submission and groups them
//! by the confirmed vulnerability they resolve to.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::findings::{ConfirmedVulnerability, Finding};
use crate::scoring::PointsTable;

/// A submission resolved to its confirmed vulnerability.
///
/// `severity` is always the confirmed vulnerability's severity - a
/// duplicate's own severity field never decides its value.
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub user_id: String,
    pub username: String,
    pub severity: String,
    pub finding_id: String,
}

/// Group every record that survives classification under the vulnerability
/// it reports, keyed by the confirmed finding's id.
///
/// Per-record anomalies (missing id, missing submitter) are skipped with a
/// diagnostic and never abort the run. Records whose id was already seen
/// are skipped silently - the provider occasionally delivers the same
/// finding twice.
pub fn group_submissions(
    findings: &[Finding],
    confirmed: &HashMap<String, ConfirmedVulnerability>,
    points: &PointsTable,
) -> BTreeMap<String, Vec<ValidSubmission>> {
    let mut submissions: BTreeMap<String, Vec<ValidSubmission>> = BTreeMap::new();
    let mut processed_ids = HashSet::new();

    for finding in findings {
        let Some(finding_id) = finding.id.as_deref().filter(|id| !id.is_empty()) else {
            warn!("skipping finding with missing id: {}", finding.label());
            continue;
        };
        if !processed_ids.insert(finding_id.to_string()) {
            continue;
        }

        let Some(created_by) = finding.created_by.as_ref() else {
            warn!("skipping finding '{}': missing submitter info", finding.label());
            continue;
        };
        let Some(user_id) = created_by.user_id.as_deref().filter(|id| !id.is_empty()) else {
            warn!("skipping finding '{}': missing submitter user id", finding.label());
            continue;
        };
        let username = created_by
            .username
            .clone()
            .unwrap_or_else(|| "N/A".to_string());

        let target = if finding.is_confirmed() {
            finding
                .severity
                .as_deref()
                .filter(|severity| points.is_payable(severity))
                .map(|severity| (finding_id.to_string(), severity.to_string()))
        } else if finding.is_duplicate() {
            resolve_duplicate(finding, confirmed, points)
        } else {
            // rejected, draft, and anything else earns nothing
            None
        };

        if let Some((vulnerability_id, severity)) = target {
            submissions
                .entry(vulnerability_id)
                .or_default()
                .push(ValidSubmission {
                    user_id: user_id.to_string(),
                    username,
                    severity,
                    finding_id: finding_id.to_string(),
                });
        }
    }

    submissions
}

/// Resolve a duplicate against the confirmed index.
///
/// The target's severity is authoritative. A duplicate of a missing,
/// unconfirmed, or non-payable original earns nothing for its submitter.
fn resolve_duplicate(
    finding: &Finding,
    confirmed: &HashMap<String, ConfirmedVulnerability>,
    points: &PointsTable,
) -> Option<(String, String)> {
    let target_id = finding.duplicate_of.as_ref()?.id.as_deref()?;
    let original = confirmed.get(target_id)?;
    let severity = original
        .severity
        .as_deref()
        .filter(|severity| points.is_payable(severity))?;
    Some((original.id.clone(), severity.to_string()))
}
