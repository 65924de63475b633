//! Reporting statistics gathered while rules run
//!
//! Classification never reads these counters. Each post scan gets its own
//! `ScanStats` and the caller merges them, so posts can be scanned in parallel.

use crate::rule_id::RuleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-rule counters of observed values (domains, protocols, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    counters: BTreeMap<RuleId, HashMap<String, usize>>,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `value` for `rule`
    pub fn record(&mut self, rule: RuleId, value: impl Into<String>) {
        *self
            .counters
            .entry(rule)
            .or_default()
            .entry(value.into())
            .or_insert(0) += 1;
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: ScanStats) {
        for (rule, counter) in other.counters {
            let target = self.counters.entry(rule).or_default();
            for (value, count) in counter {
                *target.entry(value).or_insert(0) += count;
            }
        }
    }

    /// Count for one value of one rule
    pub fn count(&self, rule: RuleId, value: &str) -> usize {
        self.counters
            .get(&rule)
            .and_then(|counter| counter.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Observations for a rule, most common first, ties by value
    pub fn most_common(&self, rule: RuleId) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .counters
            .get(&rule)
            .map(|counter| counter.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Rules that recorded anything
    pub fn rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.counters.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Free-text report line for a rule, if it has a label
    ///
    /// Format: `"<label>: a: 12, b: 3"`
    pub fn report(&self, rule: RuleId) -> Option<String> {
        let label = rule.report_label()?;
        let body = self
            .most_common(rule)
            .iter()
            .map(|(value, count)| format!("{value}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("{label}: {body}"))
    }
}
