//! sourcelint engine - scanning and consolidation
//!
//! This crate drives the rules over posts:
//! - Input parsing
//! - Rule set runner (parallel across posts)
//! - Incomplete-source candidate scan
//! - Match consolidation
//! - Report aggregation

pub mod consolidate;
pub mod input;
pub mod runner;
pub mod scanner;

pub use consolidate::PostIssues;
pub use input::{parse_jsonl, parse_line, read_jsonl, InputError, PostSources};
pub use runner::{PostScan, RuleSet, RunError, ScanOutcome};
pub use scanner::IncompleteScanner;
