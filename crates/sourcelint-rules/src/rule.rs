//! Rule abstraction
//!
//! Every rule commits to one of three input shapes. The [`Rule`] union lets the
//! runner dispatch them from a single loop while keeping the per-string
//! traversal and the "skip when there is no domain" behaviour in one place.

use sourcelint_core::{RuleFault, RuleId, RuleShape, ScanStats, SourceMatch, SourceUrl};

/// Rule that needs every source of a post at once
pub trait ListRule: Send + Sync {
    /// Stable identity of the rule
    fn id(&self) -> RuleId;

    /// Check the full, ordered source list of one post
    fn check_list(
        &self,
        sources: &[SourceUrl],
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Vec<SourceMatch>, RuleFault>;
}

/// Rule that looks at one raw source string at a time
pub trait TextRule: Send + Sync {
    /// Stable identity of the rule
    fn id(&self) -> RuleId;

    /// Check one raw source string
    fn check_text(
        &self,
        source: &str,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault>;
}

/// Rule that looks at one decomposed source at a time
///
/// Only called for sources that have a domain.
pub trait UrlRule: Send + Sync {
    /// Stable identity of the rule
    fn id(&self) -> RuleId;

    /// Check one decomposed source
    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault>;
}

/// A rule in one of its three shapes
pub enum Rule {
    List(Box<dyn ListRule>),
    Text(Box<dyn TextRule>),
    Url(Box<dyn UrlRule>),
}

impl Rule {
    /// Wrap a list rule
    pub fn list(rule: impl ListRule + 'static) -> Self {
        Self::List(Box::new(rule))
    }

    /// Wrap a text rule
    pub fn text(rule: impl TextRule + 'static) -> Self {
        Self::Text(Box::new(rule))
    }

    /// Wrap a url rule
    pub fn url(rule: impl UrlRule + 'static) -> Self {
        Self::Url(Box::new(rule))
    }

    pub fn id(&self) -> RuleId {
        match self {
            Self::List(rule) => rule.id(),
            Self::Text(rule) => rule.id(),
            Self::Url(rule) => rule.id(),
        }
    }

    pub fn shape(&self) -> RuleShape {
        match self {
            Self::List(_) => RuleShape::List,
            Self::Text(_) => RuleShape::Text,
            Self::Url(_) => RuleShape::Url,
        }
    }

    /// Run the rule over a post's sources, in source order
    pub fn check(
        &self,
        sources: &[SourceUrl],
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Vec<SourceMatch>, RuleFault> {
        match self {
            Self::List(rule) => rule.check_list(sources, post_id, stats),
            Self::Text(rule) => {
                let mut matches = Vec::new();
                for source in sources {
                    if let Some(m) = rule.check_text(&source.raw, post_id, stats)? {
                        matches.push(m);
                    }
                }
                Ok(matches)
            }
            Self::Url(rule) => {
                let mut matches = Vec::new();
                for source in sources {
                    if source.domain.is_none() {
                        tracing::trace!(rule = %rule.id(), source = %source.raw, "Skipping source without domain");
                        continue;
                    }
                    if let Some(m) = rule.check_url(source, post_id, stats)? {
                        matches.push(m);
                    }
                }
                Ok(matches)
            }
        }
    }

    /// Convenience for a single raw string, mostly for tests and `explain`
    pub fn check_str(
        &self,
        source: &str,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Vec<SourceMatch>, RuleFault> {
        self.check(&[SourceUrl::decompose(source)], post_id, stats)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id())
            .field("shape", &self.shape())
            .finish()
    }
}
