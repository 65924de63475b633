//! FurAffinity rules

use crate::domains::{
    clean_direct_link, FA_BROKEN_CDN_HOST, FA_CDN_HOST, FA_CDN_HOSTS, FA_HOST, FA_OLD_CDN_HOST,
};
use crate::incomplete::{path_segment, IncompleteRule};
use crate::rule::UrlRule;
use sourcelint_core::{MatchInfo, RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl, SITE_FA};

/// Path prefixes of profile-level pages
const PROFILE_PREFIXES: &[&str] = &["user/", "gallery/", "scraps/"];

/// Path prefix of a submission page
const SUBMISSION_PREFIX: &str = "view/";

/// Link to one comment instead of the submission
#[derive(Debug, Clone, Default)]
pub struct CommentsLink;

impl UrlRule for CommentsLink {
    fn id(&self) -> RuleId {
        RuleId::CommentsLink
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if url.domain_clean() != Some(FA_HOST) {
            return Ok(None);
        }
        let domain = url.require_domain()?;
        let Some((path, _)) = url.require_path()?.split_once("#cid") else {
            return Ok(None);
        };

        Ok(Some(
            SourceMatch::new(self.id(), post_id, &url.raw, "FA link was to a specific comment")
                .with_replacement(format!("https://{domain}/{path}")),
        ))
    }
}

/// Moves a file link from a legacy host to the canonical one
fn cdn_fix(url: &SourceUrl, host: &str) -> Result<Option<String>, RuleFault> {
    if url.domain.as_deref() != Some(host) {
        return Ok(None);
    }
    Ok(Some(format!("https://{FA_CDN_HOST}/{}", url.require_path()?)))
}

/// File link on the old CDN host, which still resolves
#[derive(Debug, Clone, Default)]
pub struct OldCdn;

impl UrlRule for OldCdn {
    fn id(&self) -> RuleId {
        RuleId::OldCdn
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        Ok(cdn_fix(url, FA_OLD_CDN_HOST)?.map(|fix| {
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                "FA direct image link using old CDN URL, which still works",
            )
            .with_replacement(fix)
        }))
    }
}

/// File link on the retired CDN host, which no longer resolves
#[derive(Debug, Clone, Default)]
pub struct BrokenCdn;

impl UrlRule for BrokenCdn {
    fn id(&self) -> RuleId {
        RuleId::BrokenCdn
    }

    fn check_url(
        &self,
        url: &SourceUrl,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        Ok(cdn_fix(url, FA_BROKEN_CDN_HOST)?.map(|fix| {
            SourceMatch::new(
                self.id(),
                post_id,
                &url.raw,
                "FA direct image link using a CDN URL which no longer resolves",
            )
            .with_replacement(fix)
        }))
    }
}

/// Username from a profile, gallery or scraps link
fn profile_user(url: &SourceUrl) -> Option<&str> {
    if url.domain_clean() != Some(FA_HOST) {
        return None;
    }
    let path = url.path.as_deref()?;
    if !PROFILE_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return None;
    }
    path_segment(path, 1)
}

/// `(user, cleaned link)` for a file link; files live under `art/<user>/...`
fn cdn_file(url: &SourceUrl) -> Option<(Option<&str>, String)> {
    let domain = url.domain.as_deref()?;
    if !FA_CDN_HOSTS.contains(&domain) {
        return None;
    }
    let user = url
        .path
        .as_deref()
        .filter(|path| path.starts_with("art/"))
        .and_then(|path| path_segment(path, 1));
    Some((user, clean_direct_link(&url.raw)))
}

fn is_submission(url: &SourceUrl) -> bool {
    url.domain_clean() == Some(FA_HOST)
        && url
            .path
            .as_deref()
            .is_some_and(|path| path.starts_with(SUBMISSION_PREFIX))
}

/// Profile link but no submission link
///
/// When the post also has a file link that does not name a different user,
/// the hint carries that link too.
#[derive(Debug, Clone, Default)]
pub struct UserLinkWithoutSubmission;

impl IncompleteRule for UserLinkWithoutSubmission {
    fn id(&self) -> RuleId {
        RuleId::UserLinkWithoutSubmission
    }

    fn imprecise_match(
        &self,
        source: &SourceUrl,
        post: &[SourceUrl],
        post_id: &str,
    ) -> Result<Option<MatchInfo>, RuleFault> {
        let Some(user) = profile_user(source) else {
            return Ok(None);
        };

        let direct_link = post.iter().filter_map(cdn_file).find_map(|(file_user, link)| {
            match file_user {
                Some(file_user) if !file_user.eq_ignore_ascii_case(user) => None,
                _ => Some(link),
            }
        });

        Ok(Some(
            MatchInfo::new(source.clone(), post_id, SITE_FA)
                .with_user(Some(user))
                .with_direct_link(direct_link),
        ))
    }

    fn is_precise_match(&self, source: &SourceUrl) -> bool {
        is_submission(source)
    }
}

/// File link but no submission link
#[derive(Debug, Clone, Default)]
pub struct DirectLinkWithoutSubmission;

impl IncompleteRule for DirectLinkWithoutSubmission {
    fn id(&self) -> RuleId {
        RuleId::DirectLinkWithoutSubmission
    }

    fn imprecise_match(
        &self,
        source: &SourceUrl,
        _post: &[SourceUrl],
        post_id: &str,
    ) -> Result<Option<MatchInfo>, RuleFault> {
        Ok(cdn_file(source).map(|(user, link)| {
            MatchInfo::new(source.clone(), post_id, SITE_FA)
                .with_user(user)
                .with_direct_link(Some(link))
        }))
    }

    fn is_precise_match(&self, source: &SourceUrl) -> bool {
        is_submission(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(rule: &dyn UrlRule, raw: &str) -> Option<SourceMatch> {
        rule.check_url(&SourceUrl::decompose(raw), "1", &mut ScanStats::new()).unwrap()
    }

    fn urls(raw: &[&str]) -> Vec<SourceUrl> {
        raw.iter().map(|s| SourceUrl::decompose(s)).collect()
    }

    #[test]
    fn comment_anchor() {
        let m = check(&CommentsLink, "https://www.furaffinity.net/view/123/#cid:456").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://www.furaffinity.net/view/123/"));
        assert_eq!(check(&CommentsLink, "https://www.furaffinity.net/view/123/"), None);
        assert_eq!(check(&CommentsLink, "https://example.com/view/123/#cid:456"), None);
    }

    #[test]
    fn old_cdn() {
        let m = check(&OldCdn, "https://d.facdn.net/somefile.jpg").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://d.furaffinity.net/somefile.jpg"));
        assert_eq!(check(&OldCdn, "https://d2.facdn.net/somefile.jpg"), None);
    }

    #[test]
    fn broken_cdn() {
        let m = check(&BrokenCdn, "http://d2.facdn.net/art/a/1/a.png").unwrap();
        assert_eq!(m.replacement.as_deref(), Some("https://d.furaffinity.net/art/a/1/a.png"));
        assert_ne!(m.reason, check(&OldCdn, "https://d.facdn.net/x").unwrap().reason);
    }

    #[test]
    fn profile_link_absorbs_file_link() {
        let sources = urls(&[
            "https://www.furaffinity.net/user/artist/",
            "https://d.furaffinity.net/img.png",
        ]);
        let found = UserLinkWithoutSubmission.find(&sources, "1").unwrap().unwrap();
        assert_eq!(found.source_match.source, "https://www.furaffinity.net/user/artist/");
        assert_eq!(found.source_match.replacement, None);
        assert_eq!(found.imprecise_matches.len(), 1);
        assert_eq!(
            found.imprecise_matches[0].identity(),
            (Some("artist"), Some("https://d.furaffinity.net/img.png"))
        );
    }

    #[test]
    fn profile_link_ignores_other_users_files() {
        let sources = urls(&[
            "https://www.furaffinity.net/gallery/artist/",
            "https://d.facdn.net/art/someoneelse/1/a.png",
        ]);
        let found = UserLinkWithoutSubmission.find(&sources, "1").unwrap().unwrap();
        assert_eq!(found.imprecise_matches[0].identity(), (Some("artist"), None));
    }

    #[test]
    fn submission_link_is_precise() {
        let sources = urls(&[
            "https://www.furaffinity.net/user/artist/",
            "https://www.furaffinity.net/view/123/",
        ]);
        assert_eq!(UserLinkWithoutSubmission.find(&sources, "1").unwrap(), None);
        assert_eq!(DirectLinkWithoutSubmission.find(&sources, "1").unwrap(), None);
    }

    #[test]
    fn file_link_hint() {
        let sources = urls(&["http://d.facdn.net/art/Artist/1600000000/1600000000.artist_pic.png"]);
        let found = DirectLinkWithoutSubmission.find(&sources, "9").unwrap().unwrap();
        assert_eq!(found.post_id(), "9");
        assert_eq!(
            found.imprecise_matches[0].identity(),
            (
                Some("Artist"),
                Some("https://d.furaffinity.net/art/Artist/1600000000/1600000000.artist_pic.png")
            )
        );
    }

    #[test]
    fn file_link_without_art_path_has_no_user() {
        let sources = urls(&["https://d.furaffinity.net/img.png"]);
        let found = DirectLinkWithoutSubmission.find(&sources, "1").unwrap().unwrap();
        assert_eq!(
            found.imprecise_matches[0].identity(),
            (None, Some("https://d.furaffinity.net/img.png"))
        );
    }
}
