//! Submission recovery by hash lookup
//!
//! For a flagged post, the post's own file hashes are searched in the archive,
//! best algorithm first. Each consolidated hint claims at most one matching
//! snapshot, and each claim becomes a proposed new source.

use crate::error::RecoveryError;
use crate::hashes::resolve_hash_priority;
use crate::index::HashIndex;
use crate::new_source::NewSource;
use crate::snapshot::{might_match, FileHash, Snapshot};
use serde::{Deserialize, Serialize};
use sourcelint_core::{MatchInfo, SITE_E621};
use sourcelint_engine::PostIssues;

/// A hint that found its submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub hint: MatchInfo,
    pub website_id: String,
    pub site_submission_id: String,
    pub new_source: NewSource,
}

/// Outcome of a lookup for one post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindResult {
    pub post_id: String,

    /// Proposed sources, in the order they were found
    pub candidates: Vec<Candidate>,

    /// Other board posts with the same file
    pub duplicates: Vec<String>,

    /// Hints no snapshot matched
    pub unclaimed: Vec<MatchInfo>,
}

impl FindResult {
    /// Whether anything was found
    pub fn is_found(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Drives hash lookups against an index
pub struct SourceFinder<'a, I: HashIndex + ?Sized> {
    index: &'a I,
    priority: Vec<i64>,
}

impl<'a, I: HashIndex + ?Sized> SourceFinder<'a, I> {
    /// Resolve the hash priority against the index's algorithms
    pub fn new(index: &'a I) -> Result<Self, RecoveryError> {
        let priority = resolve_hash_priority(&index.hash_algos()?)?;
        tracing::debug!(index = index.name(), ?priority, "Resolved hash priority");
        Ok(Self { index, priority })
    }

    /// Use an explicit list of algorithm ids, best first
    pub fn with_priority(index: &'a I, priority: Vec<i64>) -> Self {
        Self { index, priority }
    }

    pub fn priority(&self) -> &[i64] {
        &self.priority
    }

    /// Look up a post from its hashes and consolidated hints
    pub fn find(
        &self,
        post_id: &str,
        post_hashes: &[FileHash],
        hints: &[MatchInfo],
    ) -> Result<FindResult, RecoveryError> {
        let mut result = FindResult {
            post_id: post_id.to_string(),
            unclaimed: hints.to_vec(),
            ..FindResult::default()
        };

        for &algo_id in &self.priority {
            let Some(hash) = post_hashes
                .iter()
                .find(|h| h.algo_id == algo_id && !h.hash_value.is_empty())
            else {
                continue;
            };

            for snapshot in self.index.search(algo_id, &hash.hash_value)? {
                self.claim(&mut result, &snapshot)?;
            }
        }

        if result.unclaimed.is_empty() {
            tracing::info!(post_id, found = result.candidates.len(), "All hints matched");
        } else {
            tracing::info!(
                post_id,
                found = result.candidates.len(),
                unclaimed = result.unclaimed.len(),
                "Some hints have no match"
            );
        }
        Ok(result)
    }

    /// Look up a post flagged by the candidate scan, fetching its hashes from the index
    pub fn find_for_post(&self, issues: &PostIssues) -> Result<FindResult, RecoveryError> {
        let post_hashes = self.index.post_hashes(&issues.post_id)?;
        self.find(&issues.post_id, &post_hashes, &issues.unique_match_info())
    }

    fn claim(&self, result: &mut FindResult, snapshot: &Snapshot) -> Result<(), RecoveryError> {
        if snapshot.website_id == SITE_E621 {
            if snapshot.site_submission_id != result.post_id
                && !result.duplicates.contains(&snapshot.site_submission_id)
            {
                tracing::info!(
                    post_id = %result.post_id,
                    other = %snapshot.site_submission_id,
                    "Another board post matches the hash"
                );
                result.duplicates.push(snapshot.site_submission_id.clone());
            }
            return Ok(());
        }

        let mut index = 0;
        while index < result.unclaimed.len() {
            if !might_match(&result.unclaimed[index], snapshot) {
                index += 1;
                continue;
            }
            let hint = result.unclaimed.remove(index);
            let new_source = NewSource::from_snapshot(snapshot, hint.site_user_id.as_deref())?;
            tracing::info!(
                post_id = %result.post_id,
                site = %snapshot.website_id,
                submission = %snapshot.site_submission_id,
                "Found a potential source"
            );
            result.candidates.push(Candidate {
                hint,
                website_id: snapshot.website_id.clone(),
                site_submission_id: snapshot.site_submission_id.clone(),
                new_source,
            });
        }
        Ok(())
    }
}
