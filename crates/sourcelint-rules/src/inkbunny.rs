//! Inkbunny rules

use crate::domains::INKBUNNY_HOST;
use crate::rule::UrlRule;
use sourcelint_core::{RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl};

/// Submission link with a page anchor attached
#[derive(Debug, Clone, Default)]
pub struct AnchorTag;

impl UrlRule for AnchorTag {
    fn id(&self) -> RuleId {
        RuleId::AnchorTag
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if url.domain_clean() != Some(INKBUNNY_HOST) {
            return Ok(None);
        }
        let domain = url.require_domain()?;
        let Some((path, _)) = url.require_path()?.split_once('#') else {
            return Ok(None);
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, "Inkbunny links with unnecessary anchors")
                .with_replacement(format!("https://{domain}/{path}")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_anchor() {
        let url = SourceUrl::decompose("https://inkbunny.net/s/123456#pictop");
        let m = AnchorTag.check_url(&url, "1", &mut ScanStats::new()).unwrap().unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://inkbunny.net/s/123456"));

        let fixed = SourceUrl::decompose(m.replacement.as_deref().unwrap());
        assert_eq!(AnchorTag.check_url(&fixed, "1", &mut ScanStats::new()).unwrap(), None);
    }
}
