//! DeviantArt rules

use crate::domains::DEVIANTART_HOST;
use crate::rule::UrlRule;
use sourcelint_core::{RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl};

/// `<user>.deviantart.com/...` links, moved to `deviantart.com/<user>/...`
#[derive(Debug, Clone, Default)]
pub struct OldFormatUserPage;

impl UrlRule for OldFormatUserPage {
    fn id(&self) -> RuleId {
        RuleId::OldFormatUserPage
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let domain = url.domain_clean().unwrap_or_default();
        let Some(subdomain) = domain.strip_suffix(&format!(".{DEVIANTART_HOST}")) else {
            return Ok(None);
        };
        let user = subdomain.split('.').next().unwrap_or(subdomain);
        if user.is_empty() {
            return Ok(None);
        }
        let path = url.require_path()?;

        Ok(Some(
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                "Source uses the old deviantart subdomain URL format",
            )
            .with_replacement(format!("https://{DEVIANTART_HOST}/{user}/{path}")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(raw: &str) -> Option<SourceMatch> {
        OldFormatUserPage
            .check_url(&SourceUrl::decompose(raw), "1", &mut ScanStats::new())
            .unwrap()
    }

    #[test]
    fn subdomain_user_page() {
        let m = check("https://artist.deviantart.com/art/Thing-123").unwrap();
        assert_eq!(
            m.replacement.as_deref(),
            Some("https://deviantart.com/artist/art/Thing-123")
        );
    }

    #[test]
    fn www_is_not_a_user() {
        let m = check("http://www.artist.deviantart.com/gallery/").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://deviantart.com/artist/gallery/"));
        assert_eq!(check("https://www.deviantart.com/artist/art/Thing-123"), None);
    }

    #[test]
    fn fix_does_not_retrigger() {
        let fixed = check("https://artist.deviantart.com/art/Thing-123").unwrap();
        assert_eq!(check(fixed.replacement.as_deref().unwrap()), None);
    }
}
