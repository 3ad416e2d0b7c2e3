//! Finding records and classification
//!
//! Decodes raw provider entries into [`Finding`] records and builds the
//! index of confirmed vulnerabilities that duplicate submissions are
//! resolved against.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Submitter identity attached to a finding record.
#[derive(Debug, Clone, Deserialize)]
pub struct Submitter {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Reference to the original finding a duplicate re-reports.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// A single finding record as delivered by the provider.
///
/// Every field is optional: validation happens per pipeline stage, not at
/// decode time. A confirmed record with a broken submitter still has to
/// enter the confirmed index so that its duplicates stay payable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Finding {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "createdBy")]
    pub created_by: Option<Submitter>,
    #[serde(default, rename = "duplicateOf")]
    pub duplicate_of: Option<DuplicateRef>,
}

impl Finding {
    pub fn is_confirmed(&self) -> bool {
        self.status.as_deref() == Some("confirmed")
    }

    pub fn is_duplicate(&self) -> bool {
        self.status.as_deref() == Some("duplicate")
    }

    /// Display label for diagnostics: the title if present, else the id.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("N/A")
    }
}

/// A finding accepted as valid and original by the contest administrators.
///
/// Its severity is authoritative for every duplicate that resolves to it.
#[derive(Debug, Clone)]
pub struct ConfirmedVulnerability {
    pub id: String,
    pub title: Option<String>,
    pub severity: Option<String>,
}

/// Decode raw provider entries, skipping anything that is not a structured
/// finding record.
pub fn decode_findings(raw: Vec<Value>) -> Vec<Finding> {
    let mut findings = Vec::with_capacity(raw.len());
    for entry in raw {
        match serde_json::from_value::<Finding>(entry) {
            Ok(finding) => findings.push(finding),
            Err(e) => warn!("skipping malformed finding entry: {e}"),
        }
    }
    findings
}

/// Index every confirmed finding with a non-empty id.
///
/// The index intentionally ignores severity and submitter validity: a
/// confirmed finding that is itself unpayable must still be resolvable, so
/// that duplicates pointing at it are gated on *its* severity rather than
/// silently misclassified as orphans.
pub fn confirmed_index(findings: &[Finding]) -> HashMap<String, ConfirmedVulnerability> {
    let mut confirmed = HashMap::new();
    for finding in findings {
        if !finding.is_confirmed() {
            continue;
        }
        let Some(id) = finding.id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        confirmed.insert(
            id.to_string(),
            ConfirmedVulnerability {
                id: id.to_string(),
                title: finding.title.clone(),
                severity: finding.severity.clone(),
            },
        );
    }
    confirmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_skips_non_record_entries() {
        let raw = vec![
            json!({"id": "f-1", "status": "confirmed", "severity": "high"}),
            json!("not a record"),
            json!(42),
            json!({"id": "f-2", "status": "duplicate"}),
        ];

        let findings = decode_findings(raw);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].id.as_deref(), Some("f-1"));
        assert_eq!(findings[1].id.as_deref(), Some("f-2"));
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let findings = decode_findings(vec![json!({"title": "bare entry"})]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].id.is_none());
        assert!(!findings[0].is_confirmed());
        assert_eq!(findings[0].label(), "bare entry");
    }

    #[test]
    fn test_confirmed_index_requires_id() {
        let findings = decode_findings(vec![
            json!({"status": "confirmed", "severity": "high", "title": "no id"}),
            json!({"id": "", "status": "confirmed", "severity": "high"}),
            json!({"id": "f-1", "status": "confirmed", "severity": "medium"}),
        ]);

        let confirmed = confirmed_index(&findings);
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed["f-1"].severity.as_deref(), Some("medium"));
    }

    #[test]
    fn test_confirmed_index_keeps_records_without_submitter() {
        // Duplicates of this finding must still resolve even though the
        // confirmed record itself cannot earn anything.
        let findings = decode_findings(vec![
            json!({"id": "f-1", "status": "confirmed", "severity": "high", "title": "orphan original"}),
        ]);

        let confirmed = confirmed_index(&findings);
        assert!(confirmed.contains_key("f-1"));
    }

    #[test]
    fn test_confirmed_index_skips_other_statuses() {
        let findings = decode_findings(vec![
            json!({"id": "f-1", "status": "rejected", "severity": "high"}),
            json!({"id": "f-2", "status": "duplicate", "severity": "high"}),
        ]);

        assert!(confirmed_index(&findings).is_empty());
    }
}
