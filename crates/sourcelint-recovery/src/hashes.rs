//! Hash algorithm priority

use crate::error::RecoveryError;
use serde::{Deserialize, Serialize};

/// Algorithms to try, best first, as `language:algorithm`
pub const HASH_PRIORITY: &[&str] = &[
    "python:phash",
    "rust:dhash",
    "python:dhash",
    "python:whash",
    "python:ahash",
    "any:md5",
    "any:sha256",
];

/// A hash algorithm the archive knows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashAlgo {
    pub algo_id: i64,
    pub language: String,
    pub algorithm_name: String,
}

impl HashAlgo {
    pub fn new(algo_id: i64, language: impl Into<String>, algorithm_name: impl Into<String>) -> Self {
        Self {
            algo_id,
            language: language.into(),
            algorithm_name: algorithm_name.into(),
        }
    }

    /// `language:algorithm`
    pub fn key(&self) -> String {
        format!("{}:{}", self.language, self.algorithm_name)
    }
}

/// Map [`HASH_PRIORITY`] onto the archive's algorithm ids
///
/// Every prioritised algorithm must be known to the archive.
pub fn resolve_hash_priority(algos: &[HashAlgo]) -> Result<Vec<i64>, RecoveryError> {
    HASH_PRIORITY
        .iter()
        .map(|name| {
            algos
                .iter()
                .find(|algo| algo.key() == *name)
                .map(|algo| algo.algo_id)
                .ok_or_else(|| RecoveryError::UnknownHashAlgo(name.to_string()))
        })
        .collect()
}
