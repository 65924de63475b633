//! Hash-archive snapshot model
//!
//! A snapshot is the archive's record of one submission on one site, with the
//! files it had and their hashes.

use serde::{Deserialize, Serialize};
use sourcelint_core::MatchInfo;
use sourcelint_rules::clean_direct_link;

/// One hash of one file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHash {
    pub algo_id: i64,
    pub hash_value: String,
}

/// A file of a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub file_url: Option<String>,

    #[serde(default)]
    pub file_hashes: Vec<FileHash>,
}

/// The uploader as the site knows them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    pub site_user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionData {
    #[serde(default)]
    pub uploader: Option<Uploader>,

    #[serde(default)]
    pub files: Vec<SnapshotFile>,
}

/// Archive record of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Site key (`fa`, `twitter`, `e621`)
    pub website_id: String,

    pub site_submission_id: String,

    #[serde(default)]
    pub submission_data: SubmissionData,
}

impl Snapshot {
    pub fn new(website_id: impl Into<String>, site_submission_id: impl Into<String>) -> Self {
        Self {
            website_id: website_id.into(),
            site_submission_id: site_submission_id.into(),
            submission_data: SubmissionData::default(),
        }
    }

    /// Set the uploader
    pub fn with_uploader(mut self, site_user_id: impl Into<String>) -> Self {
        self.submission_data.uploader = Some(Uploader {
            site_user_id: site_user_id.into(),
        });
        self
    }

    /// Add a file with its hashes
    pub fn with_file(mut self, file_url: impl Into<String>, file_hashes: Vec<FileHash>) -> Self {
        self.submission_data.files.push(SnapshotFile {
            file_url: Some(file_url.into()),
            file_hashes,
        });
        self
    }

    pub fn uploader_id(&self) -> Option<&str> {
        self.submission_data
            .uploader
            .as_ref()
            .map(|u| u.site_user_id.as_str())
    }

    /// File links, cleaned the same way hints are
    pub fn file_urls(&self) -> Vec<String> {
        self.submission_data
            .files
            .iter()
            .filter_map(|file| file.file_url.as_deref())
            .map(clean_direct_link)
            .collect()
    }

    /// Hashes of the first file
    pub fn first_file_hashes(&self) -> &[FileHash] {
        self.submission_data
            .files
            .first()
            .map(|file| file.file_hashes.as_slice())
            .unwrap_or_default()
    }
}

/// Whether a snapshot could be the submission a hint points at
///
/// The site must match. A known user must equal the snapshot's uploader when
/// the snapshot names one, and a known direct link must be among its files.
pub fn might_match(hint: &MatchInfo, snapshot: &Snapshot) -> bool {
    if hint.site_id != snapshot.website_id {
        return false;
    }
    if let (Some(user), Some(uploader)) = (hint.site_user_id.as_deref(), snapshot.uploader_id()) {
        if !user.eq_ignore_ascii_case(uploader) {
            return false;
        }
    }
    if let Some(link) = hint.direct_image_link.as_deref() {
        if !snapshot.file_urls().iter().any(|url| url == link) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcelint_core::{SourceUrl, SITE_FA, SITE_TWITTER};

    fn hint(site: &str, user: Option<&str>, link: Option<&str>) -> MatchInfo {
        MatchInfo::new(SourceUrl::decompose("https://example.com/x"), "1", site)
            .with_user(user)
            .with_direct_link(link)
    }

    fn fa_snapshot() -> Snapshot {
        Snapshot::new(SITE_FA, "123")
            .with_uploader("artist")
            .with_file("http://d.facdn.net/art/artist/1/a.png", Vec::new())
    }

    #[test]
    fn site_must_match() {
        assert!(!might_match(&hint(SITE_TWITTER, None, None), &fa_snapshot()));
        assert!(might_match(&hint(SITE_FA, None, None), &fa_snapshot()));
    }

    #[test]
    fn user_must_match_uploader() {
        assert!(might_match(&hint(SITE_FA, Some("Artist"), None), &fa_snapshot()));
        assert!(!might_match(&hint(SITE_FA, Some("other"), None), &fa_snapshot()));
        assert!(might_match(&hint(SITE_FA, Some("other"), None), &Snapshot::new(SITE_FA, "1")));
    }

    #[test]
    fn direct_link_must_be_a_file() {
        let link = "https://d.furaffinity.net/art/artist/1/a.png";
        assert!(might_match(&hint(SITE_FA, Some("artist"), Some(link)), &fa_snapshot()));
        assert!(!might_match(
            &hint(SITE_FA, None, Some("https://d.furaffinity.net/art/artist/2/b.png")),
            &fa_snapshot()
        ));
    }

    #[test]
    fn snapshot_json() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "website_id": "fa",
            "site_submission_id": "123",
            "submission_data": {
                "uploader": {"site_user_id": "artist"},
                "files": [{
                    "file_url": "https://d.furaffinity.net/art/artist/1/a.png",
                    "file_hashes": [{"algo_id": 1, "hash_value": "abcd"}]
                }]
            }
        }))
        .unwrap();
        assert_eq!(snapshot.uploader_id(), Some("artist"));
        assert_eq!(snapshot.first_file_hashes()[0].hash_value, "abcd");
    }
}
