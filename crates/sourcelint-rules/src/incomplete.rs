//! Incomplete-source rules
//!
//! An incomplete-source rule knows two link shapes for one site: imprecise
//! links (a profile, a gallery, a bare file) that hint at a submission, and the
//! precise submission link itself. A post that has hints but no precise link
//! is flagged, and the hints are kept for the recovery lookup.

use crate::rule::ListRule;
use sourcelint_core::{
    FixableSourceMatch, MatchInfo, RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl,
};

/// Reason attached to every incomplete-source match
pub const INCOMPLETE_REASON: &str = "Post has an imprecise match, but no precise match.";

/// A rule that extracts identity hints from imprecise links
pub trait IncompleteRule: Send + Sync {
    fn id(&self) -> RuleId;

    /// Hint extracted from one source, if it is an imprecise link
    ///
    /// `post` is the post's full source list, for rules that enrich a hint from
    /// sibling sources.
    fn imprecise_match(
        &self,
        source: &SourceUrl,
        post: &[SourceUrl],
        post_id: &str,
    ) -> Result<Option<MatchInfo>, RuleFault>;

    /// Whether a source is a precise submission link for this rule's site
    fn is_precise_match(&self, source: &SourceUrl) -> bool;

    /// Flag the post if it has hints and no precise link
    fn find(
        &self,
        sources: &[SourceUrl],
        post_id: &str,
    ) -> Result<Option<FixableSourceMatch>, RuleFault> {
        let mut imprecise = Vec::new();
        let mut has_precise = false;
        for source in sources {
            if let Some(info) = self.imprecise_match(source, sources, post_id)? {
                imprecise.push(info);
            }
            if self.is_precise_match(source) {
                has_precise = true;
            }
        }

        let Some(first) = imprecise.first() else {
            return Ok(None);
        };
        if has_precise {
            return Ok(None);
        }

        let source_match = SourceMatch::new(self.id(), post_id, &first.source.raw, INCOMPLETE_REASON);
        Ok(Some(FixableSourceMatch {
            source_match,
            imprecise_matches: imprecise,
        }))
    }
}

/// Runs an incomplete-source rule as an ordinary list rule
pub struct Incomplete<R>(pub R);

impl<R: IncompleteRule> ListRule for Incomplete<R> {
    fn id(&self) -> RuleId {
        self.0.id()
    }

    fn check_list(
        &self,
        sources: &[SourceUrl],
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Vec<SourceMatch>, RuleFault> {
        Ok(self.0.find(sources, post_id)?.map(SourceMatch::from).into_iter().collect())
    }
}

/// Path segment `index`, if present and non-empty
pub(crate) fn path_segment(path: &str, index: usize) -> Option<&str> {
    path.split('/').nth(index).filter(|segment| !segment.is_empty())
}
