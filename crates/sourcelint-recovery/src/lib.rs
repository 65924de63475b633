//! sourcelint recovery - finding the submission behind an imprecise source
//!
//! Network clients and the review store are external. This crate holds the
//! values that flow across those boundaries and the lookup logic between them.

pub mod error;
pub mod finder;
pub mod hashes;
pub mod index;
pub mod new_source;
pub mod review;
pub mod snapshot;

pub use error::{IndexError, RecoveryError};
pub use finder::{Candidate, FindResult, SourceFinder};
pub use hashes::{resolve_hash_priority, HashAlgo, HASH_PRIORITY};
pub use index::{HashIndex, MemoryIndex};
pub use new_source::{post_to_url, NewSource};
pub use review::{NewSourceRow, PostStatusRow, HOTLINK_PROXY};
pub use snapshot::{might_match, FileHash, Snapshot, SnapshotFile, SubmissionData, Uploader};
