//! sourcelint core
//!
//! Core domain model with stable, versioned types.
//! Never rename rule ids - they are part of the public API.

pub mod config;
pub mod error;
pub mod report;
pub mod rule_id;
pub mod source_match;
pub mod source_url;
pub mod stats;

pub use config::{Config, ConfigError, DomainLists, MisuseThresholds, RuleSelection, ScanSettings};
pub use error::RuleFault;
pub use report::{ReportSummary, ReportVersion, RuleReport, RuleTotals, ScanReport};
pub use rule_id::{RuleId, RuleShape, UnknownRuleId};
pub use source_match::{
    FixableSourceMatch, MatchInfo, SourceMatch, SourceMatchRecord, SITE_E621, SITE_FA, SITE_TWITTER,
};
pub use source_url::SourceUrl;
pub use stats::ScanStats;
