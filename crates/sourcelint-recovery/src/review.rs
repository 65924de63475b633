//! Review-store row values
//!
//! The store itself is external; these are the values it persists, one row
//! per checked post and one per proposed source.

use crate::new_source::NewSource;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proxy that serves a direct file link for preview
pub const HOTLINK_PROXY: &str = "https://hotlink.spangle.org.uk/img/";

fn board_post_link(post_id: &str) -> String {
    format!("https://e621.net/posts/{post_id}")
}

/// When a post was last looked at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStatusRow {
    pub post_id: String,
    pub last_checked: DateTime<Utc>,

    /// Set when a reviewer chose to skip the post
    #[serde(default)]
    pub skip_date: Option<DateTime<Utc>>,
}

impl PostStatusRow {
    pub fn new(post_id: impl Into<String>, last_checked: DateTime<Utc>) -> Self {
        Self {
            post_id: post_id.into(),
            last_checked,
            skip_date: None,
        }
    }

    /// Mark the post skipped
    pub fn with_skip_date(mut self, skip_date: DateTime<Utc>) -> Self {
        self.skip_date = Some(skip_date);
        self
    }

    pub fn post_link(&self) -> String {
        board_post_link(&self.post_id)
    }

    /// Skip date as ISO 8601, or `"None"`
    pub fn skip_date_format(&self) -> String {
        self.skip_date
            .map(|date| date.to_rfc3339())
            .unwrap_or_else(|| "None".to_string())
    }
}

/// A proposed source awaiting review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSourceRow {
    pub source_id: i64,
    pub post_id: String,
    pub submission_link: String,
    pub direct_link: Option<String>,

    /// A reviewer has looked at it
    pub checked: bool,

    /// Reviewer's verdict, once checked
    pub approved: Option<bool>,
}

impl NewSourceRow {
    /// Unchecked row for a newly found source
    pub fn from_new_source(source_id: i64, post_id: impl Into<String>, source: &NewSource) -> Self {
        Self {
            source_id,
            post_id: post_id.into(),
            submission_link: source.submission_link.clone(),
            direct_link: source.direct_link.clone(),
            checked: false,
            approved: None,
        }
    }

    /// Record a reviewer's verdict
    pub fn review(&mut self, approved: bool) {
        self.checked = true;
        self.approved = Some(approved);
    }

    pub fn post_link(&self) -> String {
        board_post_link(&self.post_id)
    }

    /// Proxy link for previewing the direct file
    pub fn direct_link_fallback(&self) -> Option<String> {
        self.direct_link
            .as_deref()
            .map(|link| format!("{HOTLINK_PROXY}{}", general_purpose::STANDARD.encode(link)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn source() -> NewSource {
        NewSource {
            submission_link: "https://www.furaffinity.net/view/1/".to_string(),
            direct_link: Some("https://d.furaffinity.net/a.png".to_string()),
        }
    }

    #[test]
    fn post_status_row() {
        let checked = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let row = PostStatusRow::new("42", checked);
        assert_eq!(row.post_link(), "https://e621.net/posts/42");
        assert_eq!(row.skip_date_format(), "None");

        let row = row.with_skip_date(checked);
        assert_eq!(row.skip_date_format(), "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn new_source_row_review() {
        let mut row = NewSourceRow::from_new_source(7, "42", &source());
        assert!(!row.checked);
        assert_eq!(row.approved, None);

        row.review(true);
        assert!(row.checked);
        assert_eq!(row.approved, Some(true));
    }

    #[test]
    fn direct_link_fallback_is_base64() {
        let row = NewSourceRow::from_new_source(7, "42", &source());
        assert_eq!(
            row.direct_link_fallback().unwrap(),
            "https://hotlink.spangle.org.uk/img/aHR0cHM6Ly9kLmZ1cmFmZmluaXR5Lm5ldC9hLnBuZw=="
        );

        let mut no_file = row.clone();
        no_file.direct_link = None;
        assert_eq!(no_file.direct_link_fallback(), None);
    }
}
