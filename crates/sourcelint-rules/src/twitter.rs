//! Twitter rules
//!
//! Covers mirror and mobile hosts, tracking query strings, the image host's
//! legacy and double-fixed query layouts, and the incomplete-source rules for
//! profile and image links without a status link.

use crate::domains::{clean_direct_link, HostLists, TWITTER_HOST, TWITTER_IMAGE_HOST, TWITTER_MOBILE_HOSTS};
use crate::incomplete::IncompleteRule;
use crate::rule::UrlRule;
use sourcelint_core::{MatchInfo, RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl, SITE_TWITTER};

/// Link through a mirror or embed fixer
#[derive(Debug, Clone)]
pub struct MirrorDomain {
    hosts: HostLists,
}

impl MirrorDomain {
    pub fn new(hosts: HostLists) -> Self {
        Self { hosts }
    }
}

impl UrlRule for MirrorDomain {
    fn id(&self) -> RuleId {
        RuleId::MirrorDomain
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let domain = url.domain_clean().unwrap_or_default();
        if !self.hosts.is_twitter_mirror(domain) {
            return Ok(None);
        }
        let path = url.require_path()?;

        Ok(Some(
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                format!("TwitFix domain {domain} changed to direct twitter link"),
            )
            .with_replacement(format!("https://{TWITTER_HOST}/{path}")),
        ))
    }
}

/// Query string on a twitter or mirror link
#[derive(Debug, Clone)]
pub struct TrackingParams {
    hosts: HostLists,
}

impl TrackingParams {
    pub fn new(hosts: HostLists) -> Self {
        Self { hosts }
    }
}

impl UrlRule for TrackingParams {
    fn id(&self) -> RuleId {
        RuleId::TrackingParams
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let domain = url.domain_clean().unwrap_or_default();
        if domain != TWITTER_HOST && !self.hosts.is_twitter_mirror(domain) {
            return Ok(None);
        }
        let Some((path, _)) = url.require_path()?.split_once('?') else {
            return Ok(None);
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, "Twitter link had tracking info attached")
                .with_replacement(format!("https://{TWITTER_HOST}/{path}")),
        ))
    }
}

/// Legacy image layouts: `media/X.jpg:orig` and `media/X.jpg?name=orig`
#[derive(Debug, Clone, Default)]
pub struct OldDirectUrl;

impl OldDirectUrl {
    fn canonical_path(path: &str) -> Option<String> {
        if let Some((head, tail)) = path.split_once(':') {
            // `?format=` before the colon means a previous fix went wrong
            if head.contains("?format=") {
                return None;
            }
            let (base, name, ext) = match tail.split_once("?format=") {
                Some((name, ext)) => {
                    let base = head.split_once('.').map_or(head, |(base, _)| base);
                    (base, name, ext)
                }
                None => {
                    let (base, ext) = head.split_once('.')?;
                    (base, tail, ext)
                }
            };
            if name.is_empty() || ext.is_empty() {
                return None;
            }
            return Some(format!("{base}?format={ext}&name={name}"));
        }

        let (base, ext_args) = path.split_once('.')?;
        let (ext, args) = ext_args.split_once('?')?;
        if ext.is_empty() || args.contains("format=") {
            return None;
        }
        Some(format!("{base}?format={ext}&{args}"))
    }
}

impl UrlRule for OldDirectUrl {
    fn id(&self) -> RuleId {
        RuleId::OldDirectUrl
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if url.domain.as_deref() != Some(TWITTER_IMAGE_HOST) {
            return Ok(None);
        }
        let Some(path) = Self::canonical_path(url.require_path()?) else {
            return Ok(None);
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, "Old twitter direct image link format")
                .with_replacement(format!("https://{TWITTER_IMAGE_HOST}/{path}")),
        ))
    }
}

/// Image links mangled by an earlier fixer
///
/// Known shapes: `?format=jpg&name=orig?name=orig` and `?format=jpg:orig&name=`.
#[derive(Debug, Clone, Default)]
pub struct MalformedDirectLink;

impl MalformedDirectLink {
    /// `Some(fix)` when the link is mangled; the fix is `None` when it cannot be
    /// rebuilt unambiguously
    fn repair(path: &str) -> Option<Option<String>> {
        if let Some((prefix, _)) = path.split_once("?name=") {
            if path.contains("?format=") {
                return Some(prefix.contains("?format=").then(|| prefix.to_string()));
            }
        }

        let (prefix, args) = path.split_once("?format=")?;
        let (args, empty_name) = match args.strip_suffix("&name=") {
            Some(args) => (args, true),
            None => (args, false),
        };
        let rebuilt = args
            .split_once(':')
            .filter(|(format, name)| {
                !format.is_empty() && !name.is_empty() && !format.contains('&') && !name.contains('&')
            })
            .map(|(format, name)| format!("{prefix}?format={format}&name={name}"));

        match rebuilt {
            Some(fix) => Some(Some(fix)),
            None if empty_name => Some(None),
            None => None,
        }
    }
}

impl UrlRule for MalformedDirectLink {
    fn id(&self) -> RuleId {
        RuleId::MalformedDirectLink
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if url.domain.as_deref() != Some(TWITTER_IMAGE_HOST) {
            return Ok(None);
        }
        let Some(fix) = Self::repair(url.require_path()?) else {
            return Ok(None);
        };

        Ok(Some(
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                "Correcting twitter direct image link malformed by a previous bot",
            )
            .with_optional_replacement(fix.map(|path| format!("https://{TWITTER_IMAGE_HOST}/{path}"))),
        ))
    }
}

/// Mobile host instead of the canonical one
#[derive(Debug, Clone, Default)]
pub struct MobileLink;

impl UrlRule for MobileLink {
    fn id(&self) -> RuleId {
        RuleId::MobileLink
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let domain = url.domain_clean().unwrap_or_default();
        if !TWITTER_MOBILE_HOSTS.contains(&domain) {
            return Ok(None);
        }
        let path = url.require_path()?;

        Ok(Some(
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                format!("Switch {domain} links to direct twitter.com ones"),
            )
            .with_replacement(format!("https://{TWITTER_HOST}/{path}")),
        ))
    }
}

fn is_status_link(url: &SourceUrl) -> bool {
    url.domain_clean() == Some(TWITTER_HOST)
        && url.path.as_deref().is_some_and(|path| path.contains("/status/"))
}

/// Profile or media-tab link but no status link
#[derive(Debug, Clone, Default)]
pub struct GalleryWithoutStatus;

impl IncompleteRule for GalleryWithoutStatus {
    fn id(&self) -> RuleId {
        RuleId::GalleryWithoutStatus
    }

    fn imprecise_match(
        &self,
        source: &SourceUrl,
        _post: &[SourceUrl],
        post_id: &str,
    ) -> Result<Option<MatchInfo>, RuleFault> {
        if source.domain_clean() != Some(TWITTER_HOST) {
            return Ok(None);
        }
        let Some(path) = source.path.as_deref() else {
            return Ok(None);
        };
        if path.matches('/').count() >= 2 {
            return Ok(None);
        }
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let user = path.split('/').next().unwrap_or(path);

        Ok(Some(
            MatchInfo::new(source.clone(), post_id, SITE_TWITTER).with_user(Some(user)),
        ))
    }

    fn is_precise_match(&self, source: &SourceUrl) -> bool {
        is_status_link(source)
    }
}

/// Image link but no status link
#[derive(Debug, Clone, Default)]
pub struct DirectLinkWithoutStatus;

impl IncompleteRule for DirectLinkWithoutStatus {
    fn id(&self) -> RuleId {
        RuleId::DirectLinkWithoutStatus
    }

    fn imprecise_match(
        &self,
        source: &SourceUrl,
        _post: &[SourceUrl],
        post_id: &str,
    ) -> Result<Option<MatchInfo>, RuleFault> {
        if source.domain_clean() != Some(TWITTER_IMAGE_HOST) {
            return Ok(None);
        }
        Ok(Some(
            MatchInfo::new(source.clone(), post_id, SITE_TWITTER)
                .with_direct_link(Some(clean_direct_link(&source.raw))),
        ))
    }

    fn is_precise_match(&self, source: &SourceUrl) -> bool {
        is_status_link(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(rule: &dyn UrlRule, raw: &str) -> Option<SourceMatch> {
        rule.check_url(&SourceUrl::decompose(raw), "1", &mut ScanStats::new()).unwrap()
    }

    fn fix(rule: &dyn UrlRule, raw: &str) -> Option<String> {
        check(rule, raw).and_then(|m| m.replacement)
    }

    fn urls(raw: &[&str]) -> Vec<SourceUrl> {
        raw.iter().map(|s| SourceUrl::decompose(s)).collect()
    }

    #[test]
    fn mirror_domains() {
        let rule = MirrorDomain::new(HostLists::default());
        let m = check(&rule, "https://vxtwitter.com/someuser/status/1").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://twitter.com/someuser/status/1"));
        assert_eq!(m.reason, "TwitFix domain vxtwitter.com changed to direct twitter link");
        assert_eq!(check(&rule, "https://twitter.com/someuser/status/1"), None);
    }

    #[test]
    fn tracking_params() {
        let rule = TrackingParams::new(HostLists::default());
        assert_eq!(
            fix(&rule, "https://twitter.com/someuser/status/1?s=20&t=abc"),
            Some("https://twitter.com/someuser/status/1".to_string())
        );
        assert_eq!(
            fix(&rule, "https://fxtwitter.com/someuser/status/1?s=20"),
            Some("https://twitter.com/someuser/status/1".to_string())
        );
        assert_eq!(check(&rule, "https://twitter.com/someuser/status/1"), None);
    }

    #[test]
    fn old_direct_url_colon_layout() {
        assert_eq!(
            fix(&OldDirectUrl, "https://pbs.twimg.com/media/ABC.jpg:orig"),
            Some("https://pbs.twimg.com/media/ABC?format=jpg&name=orig".to_string())
        );
        assert_eq!(
            fix(&OldDirectUrl, "https://pbs.twimg.com/media/ABC:large?format=png"),
            Some("https://pbs.twimg.com/media/ABC?format=png&name=large".to_string())
        );
        assert_eq!(
            fix(&OldDirectUrl, "https://pbs.twimg.com/media/A.jpg:orig?format=png"),
            Some("https://pbs.twimg.com/media/A?format=png&name=orig".to_string())
        );
    }

    #[test]
    fn old_direct_url_extension_layout() {
        assert_eq!(
            fix(&OldDirectUrl, "https://pbs.twimg.com/media/ABC.jpg?name=orig"),
            Some("https://pbs.twimg.com/media/ABC?format=jpg&name=orig".to_string())
        );
    }

    #[test]
    fn old_direct_url_declines() {
        // already malformed, left for MalformedDirectLink
        assert_eq!(check(&OldDirectUrl, "https://pbs.twimg.com/media/ABC?format=jpg:orig"), None);
        assert_eq!(check(&OldDirectUrl, "https://pbs.twimg.com/media/ABC?format=jpg&name=orig"), None);
        assert_eq!(check(&OldDirectUrl, "https://pbs.twimg.com/media/ABC.jpg"), None);
        assert_eq!(check(&OldDirectUrl, "https://pbs.twimg.com/media/ABC:orig"), None);
    }

    #[test]
    fn malformed_double_name() {
        assert_eq!(
            fix(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC?format=jpg&name=orig?name=orig"),
            Some("https://pbs.twimg.com/media/ABC?format=jpg&name=orig".to_string())
        );
    }

    #[test]
    fn malformed_empty_name() {
        assert_eq!(
            fix(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC?format=jpg:orig&name="),
            Some("https://pbs.twimg.com/media/ABC?format=jpg&name=orig".to_string())
        );
        assert_eq!(
            fix(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC?format=jpg:orig"),
            Some("https://pbs.twimg.com/media/ABC?format=jpg&name=orig".to_string())
        );
    }

    #[test]
    fn malformed_but_ambiguous_is_flagged_only() {
        let m = check(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC?format=jpg&name=").unwrap();
        assert_eq!(m.replacement, None);

        let m = check(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC?name=orig&x=1?format=jpg").unwrap();
        assert_eq!(m.replacement, None);
    }

    #[test]
    fn well_formed_image_links_pass() {
        assert_eq!(check(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC?format=jpg&name=orig"), None);
        assert_eq!(check(&MalformedDirectLink, "https://pbs.twimg.com/media/ABC.jpg"), None);
    }

    #[test]
    fn mobile_links() {
        assert_eq!(
            fix(&MobileLink, "https://mobile.twitter.com/someuser/status/1"),
            Some("https://twitter.com/someuser/status/1".to_string())
        );
        assert_eq!(
            fix(&MobileLink, "https://m.twitter.com/someuser"),
            Some("https://twitter.com/someuser".to_string())
        );
    }

    #[test]
    fn gallery_without_status() {
        let found = GalleryWithoutStatus.find(&urls(&["twitter.com/someuser"]), "1").unwrap().unwrap();
        assert_eq!(found.imprecise_matches[0].identity(), (Some("someuser"), None));
        assert_eq!(found.imprecise_matches[0].site_id, SITE_TWITTER);

        let found = GalleryWithoutStatus
            .find(&urls(&["https://twitter.com/someuser/media?lang=en"]), "1")
            .unwrap()
            .unwrap();
        assert_eq!(found.imprecise_matches[0].identity(), (Some("someuser"), None));
    }

    #[test]
    fn status_link_is_precise() {
        let sources = urls(&[
            "https://twitter.com/someuser",
            "https://pbs.twimg.com/media/ABC?format=jpg&name=orig",
            "https://twitter.com/someuser/status/123",
        ]);
        assert_eq!(GalleryWithoutStatus.find(&sources, "1").unwrap(), None);
        assert_eq!(DirectLinkWithoutStatus.find(&sources, "1").unwrap(), None);
    }

    #[test]
    fn image_without_status() {
        let found = DirectLinkWithoutStatus
            .find(&urls(&["http://pbs.twimg.com/media/ABC?format=jpg&name=orig"]), "1")
            .unwrap()
            .unwrap();
        assert_eq!(
            found.imprecise_matches[0].identity(),
            (None, Some("https://pbs.twimg.com/media/ABC?format=jpg&name=orig"))
        );
    }
}
