//! Match records produced by rules
//!
//! All of these are created fresh for one post and never mutated afterwards.

use crate::rule_id::RuleId;
use crate::source_url::SourceUrl;
use serde::{Deserialize, Serialize};

/// Logical site key for furaffinity
pub const SITE_FA: &str = "fa";

/// Logical site key for twitter
pub const SITE_TWITTER: &str = "twitter";

/// Logical site key for the board itself
pub const SITE_E621: &str = "e621";

/// One rule firing on one post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SourceMatchRecord", try_from = "SourceMatchRecord")]
pub struct SourceMatch {
    /// Post the source belongs to
    pub post_id: String,

    /// Offending raw source (a representative one for list rules)
    pub source: String,

    /// Proposed fixed link; `None` means flagged but not auto-fixable
    pub replacement: Option<String>,

    /// Rule that produced the match
    pub rule: RuleId,

    /// Human-readable cause
    pub reason: String,
}

impl SourceMatch {
    /// Create a flag-only match
    pub fn new(
        rule: RuleId,
        post_id: impl Into<String>,
        source: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            source: source.into(),
            replacement: None,
            rule,
            reason: reason.into(),
        }
    }

    /// Attach a proposed replacement link
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Attach a replacement only if one could be built
    pub fn with_optional_replacement(mut self, replacement: Option<String>) -> Self {
        self.replacement = replacement;
        self
    }

    /// Whether this match carries an automatic fix
    pub fn is_fixable(&self) -> bool {
        self.replacement.is_some()
    }
}

/// Wire form of a [`SourceMatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMatchRecord {
    pub post_id: String,
    pub source: String,
    pub replacement: Option<String>,
    pub rule_module: String,
    pub rule_name: String,
    pub reason: String,
}

impl From<SourceMatch> for SourceMatchRecord {
    fn from(m: SourceMatch) -> Self {
        Self {
            post_id: m.post_id,
            source: m.source,
            replacement: m.replacement,
            rule_module: m.rule.module().to_string(),
            rule_name: m.rule.name().to_string(),
            reason: m.reason,
        }
    }
}

impl TryFrom<SourceMatchRecord> for SourceMatch {
    type Error = crate::rule_id::UnknownRuleId;

    fn try_from(record: SourceMatchRecord) -> Result<Self, Self::Error> {
        let rule = format!("{}.{}", record.rule_module, record.rule_name).parse()?;
        Ok(Self {
            post_id: record.post_id,
            source: record.source,
            replacement: record.replacement,
            rule,
            reason: record.reason,
        })
    }
}

/// Partial identity hint pulled out of an imprecise source
///
/// At least one of `site_user_id` / `direct_image_link` should be set for the
/// hint to narrow anything down; a hint with neither only says which site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchInfo {
    /// Source the hint came from
    pub source: SourceUrl,

    /// Post the source belongs to
    pub post_id: String,

    /// Logical site key (`fa`, `twitter`)
    pub site_id: String,

    /// Creator identifier, when the link shape reveals one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_user_id: Option<String>,

    /// Normalised direct file link, when the source is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_image_link: Option<String>,
}

impl MatchInfo {
    /// Create a hint that only names the site
    pub fn new(source: SourceUrl, post_id: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            source,
            post_id: post_id.into(),
            site_id: site_id.into(),
            site_user_id: None,
            direct_image_link: None,
        }
    }

    /// Set the creator identifier; empty identifiers are treated as unknown
    pub fn with_user(mut self, user: Option<impl Into<String>>) -> Self {
        self.site_user_id = user.map(Into::into).filter(|u: &String| !u.is_empty());
        self
    }

    /// Set the direct file link
    pub fn with_direct_link(mut self, link: Option<impl Into<String>>) -> Self {
        self.direct_image_link = link.map(Into::into);
        self
    }

    /// `(site_user_id, direct_image_link)` identity pair
    pub fn identity(&self) -> (Option<&str>, Option<&str>) {
        (self.site_user_id.as_deref(), self.direct_image_link.as_deref())
    }
}

/// A post with imprecise hints for a site but no precise link to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixableSourceMatch {
    /// The flag itself; never auto-fixable
    #[serde(flatten)]
    pub source_match: SourceMatch,

    /// Hints that justified the flag, in source order
    pub imprecise_matches: Vec<MatchInfo>,
}

impl FixableSourceMatch {
    /// Post the match belongs to
    pub fn post_id(&self) -> &str {
        &self.source_match.post_id
    }
}

impl From<FixableSourceMatch> for SourceMatch {
    fn from(fixable: FixableSourceMatch) -> Self {
        fixable.source_match
    }
}
