//! Hash index seam
//!
//! The archive that answers hash queries lives outside this crate. Anything
//! that can list its algorithms, return a post's own hashes and search by
//! `(algo_id, hash_value)` can drive a [`SourceFinder`](crate::SourceFinder).

use crate::error::IndexError;
use crate::hashes::HashAlgo;
use crate::snapshot::{FileHash, Snapshot};
use sourcelint_core::SITE_E621;
use std::collections::HashMap;

/// A perceptual-hash similarity index
pub trait HashIndex: Send + Sync {
    /// Get the index name (e.g., "memory")
    fn name(&self) -> &'static str;

    /// Algorithms the index knows
    fn hash_algos(&self) -> Result<Vec<HashAlgo>, IndexError>;

    /// Hashes of a board post's file
    fn post_hashes(&self, post_id: &str) -> Result<Vec<FileHash>, IndexError>;

    /// Snapshots with a file matching this hash
    fn search(&self, algo_id: i64, hash_value: &str) -> Result<Vec<Snapshot>, IndexError>;
}

/// In-memory index
///
/// Every file hash of every added snapshot is searchable. Board posts are
/// added as `e621` snapshots, so they show up in searches like the real archive.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    algos: Vec<HashAlgo>,
    snapshots: Vec<Snapshot>,
    by_hash: HashMap<FileHash, Vec<usize>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an algorithm
    pub fn with_algo(mut self, algo: HashAlgo) -> Self {
        self.algos.push(algo);
        self
    }

    /// Add a snapshot and index all of its file hashes
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.add_snapshot(snapshot);
        self
    }

    pub fn add_snapshot(&mut self, snapshot: Snapshot) {
        let position = self.snapshots.len();
        for file in &snapshot.submission_data.files {
            for hash in &file.file_hashes {
                self.by_hash.entry(hash.clone()).or_default().push(position);
            }
        }
        self.snapshots.push(snapshot);
    }

    /// Number of snapshots stored
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}

impl HashIndex for MemoryIndex {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn hash_algos(&self) -> Result<Vec<HashAlgo>, IndexError> {
        Ok(self.algos.clone())
    }

    fn post_hashes(&self, post_id: &str) -> Result<Vec<FileHash>, IndexError> {
        self.snapshots
            .iter()
            .find(|s| s.website_id == SITE_E621 && s.site_submission_id == post_id)
            .map(|s| s.first_file_hashes().to_vec())
            .ok_or_else(|| IndexError::PostNotFound(post_id.to_string()))
    }

    fn search(&self, algo_id: i64, hash_value: &str) -> Result<Vec<Snapshot>, IndexError> {
        let key = FileHash {
            algo_id,
            hash_value: hash_value.to_string(),
        };
        Ok(self
            .by_hash
            .get(&key)
            .map(|positions| positions.iter().map(|&i| self.snapshots[i].clone()).collect())
            .unwrap_or_default())
    }
}
