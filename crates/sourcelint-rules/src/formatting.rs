//! Formatting rules: spaces in links and capitalised domains

use crate::rule::UrlRule;
use sourcelint_core::{RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl};

/// Unencoded spaces in the path of a link
#[derive(Debug, Clone, Default)]
pub struct SpacesInUrl;

impl UrlRule for SpacesInUrl {
    fn id(&self) -> RuleId {
        RuleId::SpacesInUrl
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let domain = url.require_domain()?;
        let path = url.require_path()?;
        if !path.contains(' ') || !domain.contains('.') {
            return Ok(None);
        }

        let cleaned = match path.split_once('?') {
            Some((path, query)) => format!("{}?{}", path.replace(' ', "%20"), query.replace(' ', "+")),
            None => path.replace(' ', "%20"),
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, "URL has improperly encoded spaces in it")
                .with_replacement(url.rebuild(domain, &cleaned)),
        ))
    }
}

/// Domain capitalised by a phone keyboard (`Twitter.com`, `Www.Furaffinity.Net`)
#[derive(Debug, Clone, Default)]
pub struct TitlecaseDomain;

impl UrlRule for TitlecaseDomain {
    fn id(&self) -> RuleId {
        RuleId::TitlecaseDomain
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let domain = url.require_domain()?;
        let path = url.require_path()?;
        let lower = domain.to_lowercase();
        if domain == lower || (domain != title_case(domain) && domain != capitalize(domain)) {
            return Ok(None);
        }

        stats.record(self.id(), domain);
        Ok(Some(
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                "The first letter of the source URL is capitalised, probably due to a phone keyboard",
            )
            .with_replacement(url.rebuild(&lower, path)),
        ))
    }
}

/// Upper-case the first letter of every run of letters, lower-case the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Upper-case the first character, lower-case the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(rule: &dyn UrlRule, raw: &str) -> Option<SourceMatch> {
        rule.check_url(&SourceUrl::decompose(raw), "1", &mut ScanStats::new()).unwrap()
    }

    #[test]
    fn spaces_in_path() {
        let m = check(&SpacesInUrl, "https://a.com/my file.png").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://a.com/my%20file.png"));
    }

    #[test]
    fn spaces_in_query() {
        let m = check(&SpacesInUrl, "https://a.com/my file?q=two words").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://a.com/my%20file?q=two+words"));
    }

    #[test]
    fn spaces_need_a_dotted_domain() {
        assert_eq!(check(&SpacesInUrl, "localhost/my file"), None);
        assert_eq!(check(&SpacesInUrl, "https://a.com/nospace"), None);
    }

    #[test]
    fn case_helpers() {
        assert_eq!(title_case("www.furaffinity.net"), "Www.Furaffinity.Net");
        assert_eq!(title_case("9gag.com"), "9Gag.Com");
        assert_eq!(capitalize("TWITTER.com"), "Twitter.com");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn titlecase_domain() {
        let m = check(&TitlecaseDomain, "https://Twitter.com/someone").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://twitter.com/someone"));

        let m = check(&TitlecaseDomain, "Www.Furaffinity.Net/view/1/").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("www.furaffinity.net/view/1/"));
    }

    #[test]
    fn other_capitalisation_is_left_alone() {
        assert_eq!(check(&TitlecaseDomain, "https://twitter.com/someone"), None);
        assert_eq!(check(&TitlecaseDomain, "https://TWITTER.COM/someone"), None);
        assert_eq!(check(&TitlecaseDomain, "https://twitter.Com/someone"), None);
    }

    #[test]
    fn titlecase_domains_are_counted() {
        let mut stats = ScanStats::new();
        TitlecaseDomain
            .check_url(&SourceUrl::decompose("https://Twitter.com/a"), "1", &mut stats)
            .unwrap();
        assert_eq!(stats.count(RuleId::TitlecaseDomain, "Twitter.com"), 1);
    }
}
