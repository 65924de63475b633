//! Proposed replacement sources

use crate::error::RecoveryError;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use sourcelint_core::{SITE_E621, SITE_FA, SITE_TWITTER};
use sourcelint_rules::clean_direct_link;

/// Submission page for an id on a site
pub fn post_to_url(site_id: &str, submission_id: &str, username: Option<&str>) -> Result<String, RecoveryError> {
    match site_id {
        SITE_E621 => Ok(format!("https://e621.net/posts/{submission_id}/")),
        SITE_FA => Ok(format!("https://www.furaffinity.net/view/{submission_id}/")),
        SITE_TWITTER => Ok(format!(
            "https://twitter.com/{}/status/{submission_id}",
            username.unwrap_or("user")
        )),
        other => Err(RecoveryError::UnknownSite(other.to_string())),
    }
}

/// A submission link found for a post, with its file if known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSource {
    pub submission_link: String,
    pub direct_link: Option<String>,
}

impl NewSource {
    /// Build from a matching snapshot
    ///
    /// `suspected_username` fills in sites whose links need a user (twitter).
    pub fn from_snapshot(snapshot: &Snapshot, suspected_username: Option<&str>) -> Result<Self, RecoveryError> {
        let first_file = snapshot.submission_data.files.first().ok_or_else(|| RecoveryError::NoFiles {
            site: snapshot.website_id.clone(),
            id: snapshot.site_submission_id.clone(),
        })?;

        Ok(Self {
            submission_link: post_to_url(
                &snapshot.website_id,
                &snapshot.site_submission_id,
                suspected_username,
            )?,
            direct_link: first_file.file_url.as_deref().map(clean_direct_link),
        })
    }

    /// Links to add to the post, submission first
    pub fn source_links(&self) -> Vec<&str> {
        std::iter::once(self.submission_link.as_str())
            .chain(self.direct_link.as_deref())
            .collect()
    }
}
