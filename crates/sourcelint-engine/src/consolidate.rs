//! Match consolidation
//!
//! Reduces the identity hints of one post to the smallest set of distinct
//! claims per site, so each claim costs one recovery lookup.
//!
//! Per site:
//! 1. Hints naming a user are kept once per user, ignoring case. A hint with a direct link
//!    beats one without; otherwise the smaller direct link, then the smaller
//!    raw source wins.
//! 2. Hints with only a direct link are kept once per link, and dropped when a
//!    user hint already carries that link.
//! 3. Hints with neither are kept only when nothing else is, and only one.
//!
//! None of the tie-breaks depend on input order, so any permutation of the
//! same hints gives the same output.

use serde::{Deserialize, Serialize};
use sourcelint_core::{FixableSourceMatch, MatchInfo};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// The incomplete-source matches found on one post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostIssues {
    pub post_id: String,
    pub source_issues: Vec<FixableSourceMatch>,
}

impl PostIssues {
    pub fn new(post_id: impl Into<String>, source_issues: Vec<FixableSourceMatch>) -> Self {
        Self {
            post_id: post_id.into(),
            source_issues,
        }
    }

    /// Every hint of every match, in match order
    pub fn all_match_info(&self) -> impl Iterator<Item = &MatchInfo> {
        self.source_issues
            .iter()
            .flat_map(|issue| issue.imprecise_matches.iter())
    }

    /// Distinct claims grouped by site id
    pub fn unique_match_info_by_site(&self) -> BTreeMap<String, Vec<MatchInfo>> {
        let mut by_site: BTreeMap<&str, Vec<&MatchInfo>> = BTreeMap::new();
        for info in self.all_match_info() {
            by_site.entry(info.site_id.as_str()).or_default().push(info);
        }

        by_site
            .into_iter()
            .map(|(site, hints)| (site.to_string(), consolidate_site(hints)))
            .collect()
    }

    /// Distinct claims for all sites, ordered by site
    pub fn unique_match_info(&self) -> Vec<MatchInfo> {
        self.unique_match_info_by_site()
            .into_values()
            .flatten()
            .collect()
    }
}

/// Ordering of competing hints for the same slot; `Less` wins
fn preference(a: &MatchInfo, b: &MatchInfo) -> Ordering {
    b.direct_image_link
        .is_some()
        .cmp(&a.direct_image_link.is_some())
        .then_with(|| a.direct_image_link.cmp(&b.direct_image_link))
        .then_with(|| a.source.raw.cmp(&b.source.raw))
}

fn keep_preferred<'a>(slot: &mut Option<&'a MatchInfo>, candidate: &'a MatchInfo) {
    let replace = match *slot {
        Some(current) => preference(candidate, current) == Ordering::Less,
        None => true,
    };
    if replace {
        *slot = Some(candidate);
    }
}

fn consolidate_site(hints: Vec<&MatchInfo>) -> Vec<MatchInfo> {
    // Usernames are case-insensitive on every supported site
    let mut by_user: BTreeMap<String, Option<&MatchInfo>> = BTreeMap::new();
    let mut by_link: BTreeMap<&str, Option<&MatchInfo>> = BTreeMap::new();
    let mut site_only: Option<&MatchInfo> = None;

    for hint in hints {
        match hint.identity() {
            (Some(user), _) => keep_preferred(by_user.entry(user.to_lowercase()).or_default(), hint),
            (None, Some(link)) => keep_preferred(by_link.entry(link).or_default(), hint),
            (None, None) => keep_preferred(&mut site_only, hint),
        }
    }

    let claimed_links: BTreeSet<String> = by_user
        .values()
        .flatten()
        .filter_map(|hint| hint.direct_image_link.as_deref())
        .map(str::to_lowercase)
        .collect();

    let mut claims: Vec<MatchInfo> = by_user.into_values().flatten().cloned().collect();
    claims.extend(
        by_link
            .into_iter()
            .filter(|(link, _)| !claimed_links.contains(&link.to_lowercase()))
            .filter_map(|(_, hint)| hint.cloned()),
    );

    if claims.is_empty() {
        claims.extend(site_only.cloned());
    }
    claims
}
