//! Protocol rules: missing, truncated, unknown and plain-http protocols

use crate::domains::HostLists;
use crate::rule::UrlRule;
use sourcelint_core::{RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl};

/// Protocols a source may legitimately use
const KNOWN_PROTOCOLS: &[&str] = &["http", "https", "ftp"];

/// No protocol at all; fixable when the host is known to serve https
#[derive(Debug, Clone)]
pub struct MissingProtocol {
    hosts: HostLists,
}

impl MissingProtocol {
    pub fn new(hosts: HostLists) -> Self {
        Self { hosts }
    }
}

impl UrlRule for MissingProtocol {
    fn id(&self) -> RuleId {
        RuleId::MissingProtocol
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if url.protocol().is_some() {
            return Ok(None);
        }
        let domain = url.domain_clean().unwrap_or_default();
        if domain.is_empty() {
            return Ok(None);
        }

        let fix = if self.hosts.is_secure(domain) {
            let bare = url.raw.strip_prefix("://").unwrap_or(&url.raw);
            Some(format!("https://{bare}"))
        } else {
            stats.record(self.id(), domain);
            None
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, "No protocol specified on link")
                .with_optional_replacement(fix),
        ))
    }
}

/// Protocol that lost its first characters (`ttps://`, `tps://`, `ps://`)
#[derive(Debug, Clone, Default)]
pub struct BrokenProtocol;

impl UrlRule for BrokenProtocol {
    fn id(&self) -> RuleId {
        RuleId::BrokenProtocol
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let (missing, reason) = match url.protocol() {
            Some("ttp" | "ttps") => ("h", "Source URL is missing first character"),
            Some("tp" | "tps") => ("ht", "Source URL is missing first two chars"),
            Some("p" | "ps") => ("htt", "Source URL is missing three chars"),
            _ => return Ok(None),
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, reason)
                .with_replacement(format!("{missing}{}", url.raw)),
        ))
    }
}

/// Protocol that is neither known nor a truncation of a known one
#[derive(Debug, Clone, Default)]
pub struct UnknownProtocol;

impl UnknownProtocol {
    /// A known protocol, or one of them with leading characters dropped
    fn is_recognised(protocol: &str) -> bool {
        KNOWN_PROTOCOLS.iter().any(|known| known.ends_with(protocol))
    }
}

impl UrlRule for UnknownProtocol {
    fn id(&self) -> RuleId {
        RuleId::UnknownProtocol
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let Some(protocol) = url.protocol() else {
            return Ok(None);
        };
        if Self::is_recognised(protocol) {
            return Ok(None);
        }

        stats.record(self.id(), protocol);
        Ok(Some(SourceMatch::new(
            self.id(),
            post_id,
            &url.raw,
            format!("Unknown protocol on URL: {protocol}"),
        )))
    }
}

/// Plain http on a host known to serve https
///
/// Other http hosts are counted for the report but not flagged.
#[derive(Debug, Clone)]
pub struct InsecureProtocol {
    hosts: HostLists,
}

impl InsecureProtocol {
    pub fn new(hosts: HostLists) -> Self {
        Self { hosts }
    }
}

impl UrlRule for InsecureProtocol {
    fn id(&self) -> RuleId {
        RuleId::InsecureProtocol
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if url.protocol() != Some("http") {
            return Ok(None);
        }
        let domain = url.require_domain()?;
        let path = url.require_path()?;
        let domain_clean = url.domain_clean().unwrap_or(domain);

        if !self.hosts.is_secure(domain_clean) {
            stats.record(self.id(), domain_clean);
            return Ok(None);
        }

        Ok(Some(
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                "Using http protocol in source URL when domain supports https",
            )
            .with_replacement(format!("https://{domain}/{path}")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(rule: &dyn UrlRule, raw: &str, stats: &mut ScanStats) -> Option<SourceMatch> {
        rule.check_url(&SourceUrl::decompose(raw), "1", stats).unwrap()
    }

    #[test]
    fn missing_protocol_on_known_host() {
        let rule = MissingProtocol::new(HostLists::default());
        let m = check(&rule, "twitter.com/someuser", &mut ScanStats::new()).unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://twitter.com/someuser"));
        assert_eq!(m.reason, "No protocol specified on link");
    }

    #[test]
    fn missing_protocol_on_unknown_host_is_counted() {
        let rule = MissingProtocol::new(HostLists::default());
        let mut stats = ScanStats::new();
        let m = check(&rule, "www.example.com/page", &mut stats).unwrap();
        assert_eq!(m.replacement, None);
        assert_eq!(stats.count(RuleId::MissingProtocol, "example.com"), 1);
    }

    #[test]
    fn missing_protocol_with_empty_subdomain_is_not_fixed() {
        let rule = MissingProtocol::new(HostLists::default());
        let mut stats = ScanStats::new();
        let m = check(&rule, ".deviantart.com/a", &mut stats).unwrap();
        assert_eq!(m.replacement, None);
        assert_eq!(stats.count(RuleId::MissingProtocol, ".deviantart.com"), 1);
    }

    #[test]
    fn empty_protocol_is_missing() {
        let rule = MissingProtocol::new(HostLists::default());
        let m = check(&rule, "://twitter.com/a", &mut ScanStats::new()).unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://twitter.com/a"));
    }

    #[test]
    fn missing_protocol_needs_a_domain() {
        let rule = MissingProtocol::new(HostLists::default());
        assert_eq!(check(&rule, "/just/a/path", &mut ScanStats::new()), None);
        assert_eq!(check(&rule, "https://twitter.com/a", &mut ScanStats::new()), None);
    }

    #[test]
    fn broken_protocols() {
        let cases = [
            ("ttps://a.com/x", "https://a.com/x"),
            ("ttp://a.com/x", "http://a.com/x"),
            ("tps://a.com/x", "https://a.com/x"),
            ("tp://a.com/x", "http://a.com/x"),
            ("ps://a.com/x", "https://a.com/x"),
            ("p://a.com/x", "http://a.com/x"),
        ];
        for (raw, fixed) in cases {
            let m = check(&BrokenProtocol, raw, &mut ScanStats::new()).unwrap();
            assert_eq!(m.replacement.as_deref(), Some(fixed), "{raw}");
        }
        assert_eq!(check(&BrokenProtocol, "https://a.com/x", &mut ScanStats::new()), None);
    }

    #[test]
    fn unknown_protocols() {
        let mut stats = ScanStats::new();
        assert_eq!(check(&UnknownProtocol, "ftp://a.com/x", &mut stats), None);
        assert_eq!(check(&UnknownProtocol, "tps://a.com/x", &mut stats), None);
        assert_eq!(check(&UnknownProtocol, "s://a.com/x", &mut stats), None);

        let m = check(&UnknownProtocol, "hxxps://a.com/x", &mut stats).unwrap();
        assert_eq!(m.reason, "Unknown protocol on URL: hxxps");
        assert_eq!(m.replacement, None);
        assert_eq!(stats.count(RuleId::UnknownProtocol, "hxxps"), 1);
    }

    #[test]
    fn insecure_protocol() {
        let rule = InsecureProtocol::new(HostLists::default());
        let mut stats = ScanStats::new();

        let m = check(&rule, "http://www.furaffinity.net/view/1/", &mut stats).unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://www.furaffinity.net/view/1/"));

        assert_eq!(check(&rule, "http://example.com/a", &mut stats), None);
        assert_eq!(stats.count(RuleId::InsecureProtocol, "example.com"), 1);
    }
}
