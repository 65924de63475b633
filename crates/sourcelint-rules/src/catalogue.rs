//! Default rule catalogue
//!
//! Declaration order here is the order matches come out of a scan.

use crate::deviantart::OldFormatUserPage;
use crate::domains::HostLists;
use crate::furaffinity::{BrokenCdn, CommentsLink, DirectLinkWithoutSubmission, OldCdn, UserLinkWithoutSubmission};
use crate::incomplete::{Incomplete, IncompleteRule};
use crate::inkbunny::AnchorTag;
use crate::misuse::{CommaSeparated, EmailAddress, FreeText, LocalPath, TagList, TwoUrlsOnOneLine};
use crate::protocols::{BrokenProtocol, InsecureProtocol, MissingProtocol, UnknownProtocol};
use crate::formatting::{SpacesInUrl, TitlecaseDomain};
use crate::rule::Rule;
use crate::twitter::{
    DirectLinkWithoutStatus, GalleryWithoutStatus, MalformedDirectLink, MirrorDomain, MobileLink,
    OldDirectUrl, TrackingParams,
};
use sourcelint_core::{Config, RuleId};

/// Errors building the rule set
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("Invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Every rule, in declaration order, configured from `config`
pub fn all_rules(config: &Config) -> Result<Vec<Rule>, CatalogueError> {
    let hosts = HostLists::from_config(&config.domains);

    Ok(vec![
        Rule::url(MirrorDomain::new(hosts.clone())),
        Rule::url(TrackingParams::new(hosts.clone())),
        Rule::url(CommentsLink),
        Rule::text(CommaSeparated),
        Rule::url(OldCdn),
        Rule::url(BrokenCdn),
        Rule::list(Incomplete(UserLinkWithoutSubmission)),
        Rule::list(Incomplete(DirectLinkWithoutSubmission)),
        Rule::text(TagList::new(&config.misuse)),
        Rule::text(FreeText::new(&config.misuse)),
        Rule::list(EmailAddress),
        Rule::text(LocalPath::new()?),
        Rule::url(MissingProtocol::new(hosts.clone())),
        Rule::url(BrokenProtocol),
        Rule::url(UnknownProtocol),
        Rule::url(InsecureProtocol::new(hosts)),
        Rule::url(SpacesInUrl),
        Rule::url(TitlecaseDomain),
        Rule::text(TwoUrlsOnOneLine),
        Rule::url(OldFormatUserPage),
        Rule::url(AnchorTag),
        Rule::url(OldDirectUrl),
        Rule::url(MalformedDirectLink),
        Rule::url(MobileLink),
        Rule::list(Incomplete(GalleryWithoutStatus)),
        Rule::list(Incomplete(DirectLinkWithoutStatus)),
    ])
}

/// Enabled rules, in declaration order
pub fn default_rules(config: &Config) -> Result<Vec<Rule>, CatalogueError> {
    let rules: Vec<Rule> = all_rules(config)?
        .into_iter()
        .filter(|rule| config.rules.is_enabled(rule.id()))
        .collect();
    tracing::debug!(count = rules.len(), "Built rule set");
    Ok(rules)
}

/// Enabled incomplete-source rules, for the recovery candidate scan
pub fn incomplete_rules(config: &Config) -> Vec<Box<dyn IncompleteRule>> {
    let rules: Vec<Box<dyn IncompleteRule>> = vec![
        Box::new(UserLinkWithoutSubmission),
        Box::new(DirectLinkWithoutSubmission),
        Box::new(GalleryWithoutStatus),
        Box::new(DirectLinkWithoutStatus),
    ];
    rules
        .into_iter()
        .filter(|rule| config.rules.is_enabled(rule.id()))
        .collect()
}
