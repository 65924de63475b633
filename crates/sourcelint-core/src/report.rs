//! Scan report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use crate::rule_id::RuleId;
use crate::source_match::SourceMatch;
use crate::stats::ScanStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of posts with a non-empty source field
    pub posts_scanned: usize,

    /// Number of posts with at least one match
    pub posts_with_matches: usize,

    /// Total number of matches
    pub total: usize,

    /// Matches that carry a replacement
    pub auto_fixable: usize,
}

/// Match totals for one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTotals {
    pub rule: RuleId,

    /// Matches produced
    pub total: usize,

    /// Matches with a replacement
    pub auto_fixable: usize,
}

impl RuleTotals {
    /// Share of matches that can be fixed automatically, 0.0 to 100.0
    pub fn solvable_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.auto_fixable as f64 / self.total as f64 * 100.0
    }
}

/// Free-text statistics from a rule that tracks them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReport {
    pub rule: RuleId,
    pub text: String,
}

/// Scan report (report.json v1)
///
/// This is the stable output format.
/// All fields are versioned and backward-compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Per-rule totals, most matches first
    pub by_rule: Vec<RuleTotals>,

    /// Statistics text from rules that collect any
    pub rule_reports: Vec<RuleReport>,

    /// All matches keyed by post id
    pub matches: BTreeMap<String, Vec<SourceMatch>>,
}

impl ScanReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            by_rule: Vec::new(),
            rule_reports: Vec::new(),
            matches: BTreeMap::new(),
        }
    }

    /// Build a report from the matches of a whole scan
    ///
    /// `rules` is the configured rule list; every rule gets a totals row, even
    /// with zero matches, and rules with a report label get a report line.
    pub fn from_scan(
        posts_scanned: usize,
        matches: BTreeMap<String, Vec<SourceMatch>>,
        rules: &[RuleId],
        stats: &ScanStats,
    ) -> Self {
        let mut counts: HashMap<RuleId, (usize, usize)> =
            rules.iter().map(|rule| (*rule, (0, 0))).collect();

        let mut summary = ReportSummary {
            posts_scanned,
            ..ReportSummary::default()
        };

        for post_matches in matches.values() {
            if !post_matches.is_empty() {
                summary.posts_with_matches += 1;
            }
            for m in post_matches {
                let entry = counts.entry(m.rule).or_insert((0, 0));
                entry.0 += 1;
                summary.total += 1;
                if m.is_fixable() {
                    entry.1 += 1;
                    summary.auto_fixable += 1;
                }
            }
        }

        let mut by_rule: Vec<RuleTotals> = counts
            .into_iter()
            .map(|(rule, (total, auto_fixable))| RuleTotals {
                rule,
                total,
                auto_fixable,
            })
            .collect();
        by_rule.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.rule.cmp(&b.rule)));

        let rule_reports = rules
            .iter()
            .filter_map(|rule| {
                stats.report(*rule).map(|text| RuleReport { rule: *rule, text })
            })
            .collect();

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            by_rule,
            rule_reports,
            matches,
        }
    }

    /// Totals row for one rule
    pub fn totals_for(&self, rule: RuleId) -> Option<&RuleTotals> {
        self.by_rule.iter().find(|t| t.rule == rule)
    }

    /// Check if the scan found anything
    pub fn has_matches(&self) -> bool {
        self.summary.total > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}
