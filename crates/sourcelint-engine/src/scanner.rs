//! Candidate scan for the recovery flow
//!
//! Runs only the incomplete-source rules and keeps their hints, grouped per
//! post, ready for consolidation.

use crate::consolidate::PostIssues;
use crate::input::PostSources;
use crate::runner::RunError;
use rayon::prelude::*;
use sourcelint_core::Config;
use sourcelint_rules::{incomplete_rules, IncompleteRule};
use std::collections::BTreeMap;

/// Runs incomplete-source rules over posts
pub struct IncompleteScanner {
    rules: Vec<Box<dyn IncompleteRule>>,
    parallel: bool,
}

impl IncompleteScanner {
    pub fn new(rules: Vec<Box<dyn IncompleteRule>>) -> Self {
        Self {
            rules,
            parallel: true,
        }
    }

    /// The enabled incomplete-source rules for a config
    pub fn from_config(config: &Config) -> Self {
        Self::new(incomplete_rules(config)).with_parallel(config.scan.parallel)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Issues for one post, `None` if no rule flagged it
    pub fn scan_post(&self, post: &PostSources) -> Result<Option<PostIssues>, RunError> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            let found = rule.find(&post.sources, &post.post_id).map_err(|fault| {
                tracing::error!(rule = %rule.id(), post_id = %post.post_id, error = %fault, "Rule fault, aborting scan");
                RunError::RuleFailed {
                    rule: rule.id(),
                    post_id: post.post_id.clone(),
                    fault,
                }
            })?;
            issues.extend(found);
        }

        if issues.is_empty() {
            return Ok(None);
        }
        Ok(Some(PostIssues::new(post.post_id.clone(), issues)))
    }

    /// Issues for every flagged post, keyed by post id
    pub fn scan(&self, posts: &[PostSources]) -> Result<BTreeMap<String, PostIssues>, RunError> {
        let flagged: Vec<PostIssues> = if self.parallel {
            posts
                .par_iter()
                .map(|post| self.scan_post(post))
                .filter_map(Result::transpose)
                .collect::<Result<_, _>>()?
        } else {
            posts
                .iter()
                .map(|post| self.scan_post(post))
                .filter_map(Result::transpose)
                .collect::<Result<_, _>>()?
        };

        tracing::info!(posts = posts.len(), flagged = flagged.len(), "Candidate scan complete");
        Ok(flagged
            .into_iter()
            .map(|issues| (issues.post_id.clone(), issues))
            .collect())
    }
}

impl std::fmt::Debug for IncompleteScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncompleteScanner")
            .field("rules", &self.rules.iter().map(|r| r.id()).collect::<Vec<_>>())
            .field("parallel", &self.parallel)
            .finish()
    }
}
