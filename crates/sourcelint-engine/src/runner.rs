//! Rule set runner
//!
//! Rules run in declaration order against one post at a time. Posts are
//! independent, so a batch can be scanned in parallel; each post gets its own
//! statistics accumulator and the results are merged afterwards.

use crate::input::PostSources;
use rayon::prelude::*;
use sourcelint_core::{Config, RuleFault, RuleId, ScanReport, ScanStats, SourceMatch};
use sourcelint_rules::{default_rules, CatalogueError, Rule};
use std::collections::BTreeMap;

/// Errors that stop a run
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Rule {rule} failed on post {post_id}: {fault}")]
    RuleFailed {
        rule: RuleId,
        post_id: String,
        fault: RuleFault,
    },

    #[error("Failed to build rule set: {0}")]
    Catalogue(#[from] CatalogueError),
}

/// Matches and statistics from one post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostScan {
    pub post_id: String,

    /// Matches in rule declaration order
    pub matches: Vec<SourceMatch>,

    pub stats: ScanStats,
}

/// Merged result of scanning many posts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub posts_scanned: usize,

    /// Matches keyed by post id; posts without matches are left out
    pub matches: BTreeMap<String, Vec<SourceMatch>>,

    pub stats: ScanStats,
}

impl ScanOutcome {
    /// Add one post's result
    pub fn absorb(&mut self, scan: PostScan) {
        self.posts_scanned += 1;
        self.stats.merge(scan.stats);
        if !scan.matches.is_empty() {
            self.matches.entry(scan.post_id).or_default().extend(scan.matches);
        }
    }

    /// Fold another partial outcome into this one
    pub fn merge(&mut self, other: ScanOutcome) {
        self.posts_scanned += other.posts_scanned;
        self.stats.merge(other.stats);
        for (post_id, matches) in other.matches {
            self.matches.entry(post_id).or_default().extend(matches);
        }
    }

    pub fn total_matches(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Build the stable report for the rules that ran
    pub fn into_report(self, rules: &[RuleId]) -> ScanReport {
        ScanReport::from_scan(self.posts_scanned, self.matches, rules, &self.stats)
    }
}

/// An ordered set of rules
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
    parallel: bool,
}

impl RuleSet {
    /// Create a rule set from explicit rules
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            parallel: true,
        }
    }

    /// The enabled default rules for a config
    pub fn from_config(config: &Config) -> Result<Self, RunError> {
        Ok(Self::new(default_rules(config)?).with_parallel(config.scan.parallel))
    }

    /// Scan batches in parallel or not
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(Rule::id).collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against one post
    ///
    /// A rule fault aborts the run; nothing found so far is returned.
    pub fn run(&self, post: &PostSources) -> Result<PostScan, RunError> {
        let mut stats = ScanStats::new();
        let mut matches = Vec::new();

        for rule in &self.rules {
            let found = rule
                .check(&post.sources, &post.post_id, &mut stats)
                .map_err(|fault| {
                    tracing::error!(
                        rule = %rule.id(),
                        post_id = %post.post_id,
                        error = %fault,
                        "Rule fault, aborting run"
                    );
                    RunError::RuleFailed {
                        rule: rule.id(),
                        post_id: post.post_id.clone(),
                        fault,
                    }
                })?;

            for m in &found {
                tracing::debug!(
                    rule = %m.rule,
                    post_id = %m.post_id,
                    source = %m.source,
                    fixable = m.is_fixable(),
                    "Rule matched"
                );
            }
            matches.extend(found);
        }

        Ok(PostScan {
            post_id: post.post_id.clone(),
            matches,
            stats,
        })
    }

    /// Run every rule against raw source strings
    pub fn run_sources<S: AsRef<str>>(&self, post_id: &str, sources: &[S]) -> Result<PostScan, RunError> {
        self.run(&PostSources::from_sources(post_id, sources))
    }

    /// Scan a batch of posts
    pub fn scan(&self, posts: &[PostSources]) -> Result<ScanOutcome, RunError> {
        let outcome = if self.parallel {
            posts
                .par_iter()
                .try_fold(ScanOutcome::default, |mut acc, post| -> Result<ScanOutcome, RunError> {
                    acc.absorb(self.run(post)?);
                    Ok(acc)
                })
                .try_reduce(ScanOutcome::default, |mut a, b| {
                    a.merge(b);
                    Ok(a)
                })?
        } else {
            let mut acc = ScanOutcome::default();
            for post in posts {
                acc.absorb(self.run(post)?);
            }
            acc
        };

        tracing::info!(
            posts = outcome.posts_scanned,
            posts_with_matches = outcome.matches.len(),
            matches = outcome.total_matches(),
            "Scan complete"
        );
        Ok(outcome)
    }

    /// Scan a batch and build the report
    pub fn report(&self, posts: &[PostSources]) -> Result<ScanReport, RunError> {
        Ok(self.scan(posts)?.into_report(&self.ids()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sourcelint_core::SourceUrl;
    use sourcelint_rules::UrlRule;

    /// Faults on every source it sees
    struct Faulty;

    impl UrlRule for Faulty {
        fn id(&self) -> RuleId {
            RuleId::MobileLink
        }

        fn check_url(
            &self,
            url: &SourceUrl,
            _post_id: &str,
            _stats: &mut ScanStats,
        ) -> Result<Option<SourceMatch>, RuleFault> {
            Err(RuleFault::invariant("always faults", &url.raw))
        }
    }

    fn posts() -> Vec<PostSources> {
        vec![
            PostSources::from_field("1", "https://d.facdn.net/art/a/1/a.png\nhttps://www.furaffinity.net/view/1/"),
            PostSources::from_field("2", "https://www.furaffinity.net/view/2/"),
            PostSources::from_field("3", "hxxps://example.com/x"),
        ]
    }

    #[test]
    fn matches_follow_rule_order() {
        let rules = RuleSet::from_config(&Config::default()).unwrap();
        let scan = rules.run_sources("1", &["twitter.com/someuser"]).unwrap();
        let ids: Vec<RuleId> = scan.matches.iter().map(|m| m.rule).collect();
        assert_eq!(ids, vec![RuleId::MissingProtocol, RuleId::GalleryWithoutStatus]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let config = Config::default();
        let parallel = RuleSet::from_config(&config).unwrap().scan(&posts()).unwrap();
        let sequential = RuleSet::from_config(&config)
            .unwrap()
            .with_parallel(false)
            .scan(&posts())
            .unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.posts_scanned, 3);
        assert_eq!(parallel.matches.len(), 2);
        assert_eq!(parallel.stats.count(RuleId::UnknownProtocol, "hxxps"), 1);
    }

    #[test]
    fn fault_aborts_the_run() {
        let rules = RuleSet::new(vec![Rule::url(Faulty)]);
        let err = rules.scan(&posts()).unwrap_err();
        assert!(matches!(err, RunError::RuleFailed { rule: RuleId::MobileLink, .. }));
    }

    #[test]
    fn domainless_sources_never_reach_url_rules() {
        let rules = RuleSet::new(vec![Rule::url(Faulty)]);
        let scan = rules.run_sources("1", &["just some words"]).unwrap();
        assert!(scan.matches.is_empty());
    }

    #[test]
    fn report_counts_every_rule() {
        let rules = RuleSet::from_config(&Config::default()).unwrap();
        let report = rules.report(&posts()).unwrap();
        assert_eq!(report.summary.posts_scanned, 3);
        assert_eq!(report.by_rule.len(), rules.len());
        assert_eq!(report.totals_for(RuleId::OldCdn).unwrap().auto_fixable, 1);
    }
}
