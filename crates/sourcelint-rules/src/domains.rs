//! Host lists shared by the rules

use sourcelint_core::DomainLists;

/// Hosts known to serve https, matched exactly on the `www.`-less domain
pub const SECURE_HOSTS: &[&str] = &[
    "furaffinity.net",
    "t.me",
    "twitter.com",
    "patreon.com",
    "weasyl.com",
];

/// Multi-tenant parents whose subdomains all serve https
pub const SECURE_SUFFIXES: &[&str] = &[
    "deviantart.com",
    "tumblr.com",
    "artstation.com",
    "newgrounds.com",
];

/// Twitter mirrors and embed fixers
pub const TWITTER_MIRRORS: &[&str] = &[
    "vxtwitter.com",
    "ayytwitter.com",
    "fxtwitter.com",
    "pxtwitter.com",
    "twitter64.com",
    "twittpr.com",
    "nitter.net",
];

pub const FA_HOST: &str = "furaffinity.net";

/// Canonical FA file host
pub const FA_CDN_HOST: &str = "d.furaffinity.net";

/// Old FA file host, still resolves
pub const FA_OLD_CDN_HOST: &str = "d.facdn.net";

/// Old FA file host, no longer resolves
pub const FA_BROKEN_CDN_HOST: &str = "d2.facdn.net";

/// Every host FA has served files from
pub const FA_CDN_HOSTS: &[&str] = &[FA_CDN_HOST, FA_OLD_CDN_HOST, FA_BROKEN_CDN_HOST];

pub const TWITTER_HOST: &str = "twitter.com";

/// Twitter image host
pub const TWITTER_IMAGE_HOST: &str = "pbs.twimg.com";

pub const TWITTER_MOBILE_HOSTS: &[&str] = &["mobile.twitter.com", "m.twitter.com"];

pub const INKBUNNY_HOST: &str = "inkbunny.net";

pub const DEVIANTART_HOST: &str = "deviantart.com";

/// Built-in host lists merged with the configured extras
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLists {
    secure: Vec<String>,
    secure_suffixes: Vec<String>,
    twitter_mirrors: Vec<String>,
}

impl HostLists {
    /// Built-in lists plus the ones from `[domains]`
    pub fn from_config(extra: &DomainLists) -> Self {
        Self {
            secure: merge(SECURE_HOSTS, &extra.secure),
            secure_suffixes: merge(SECURE_SUFFIXES, &extra.secure_suffixes),
            twitter_mirrors: merge(TWITTER_MIRRORS, &extra.twitter_mirrors),
        }
    }

    /// Whether a `www.`-less domain is known to serve https
    pub fn is_secure(&self, domain_clean: &str) -> bool {
        let domain = domain_clean.to_lowercase();
        self.secure.iter().any(|host| *host == domain)
            || matches_suffix_list(&domain, &self.secure_suffixes)
    }

    /// Whether a `www.`-less domain is a twitter mirror
    pub fn is_twitter_mirror(&self, domain_clean: &str) -> bool {
        let domain = domain_clean.to_lowercase();
        self.twitter_mirrors.iter().any(|host| *host == domain)
    }
}

impl Default for HostLists {
    fn default() -> Self {
        Self::from_config(&DomainLists::default())
    }
}

fn merge(builtin: &[&str], extra: &[String]) -> Vec<String> {
    let mut hosts: Vec<String> = builtin.iter().map(|h| h.to_string()).collect();
    for host in extra {
        let host = host.to_lowercase();
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}

/// Exact or subdomain match against a list of parents
fn matches_suffix_list(domain: &str, parents: &[String]) -> bool {
    parents
        .iter()
        .any(|parent| domain == parent || is_subdomain_of(domain, parent))
}

/// `<label>.<parent>` with a non-empty label
fn is_subdomain_of(domain: &str, parent: &str) -> bool {
    domain
        .strip_suffix(parent)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|label| !label.is_empty() && !label.ends_with('.'))
}

/// Normalise a direct file link: force https and move old FA hosts to the current one
pub fn clean_direct_link(link: &str) -> String {
    let link = match link.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => link.to_string(),
    };
    for host in [FA_OLD_CDN_HOST, FA_BROKEN_CDN_HOST] {
        if let Some(rest) = link.strip_prefix(&format!("https://{host}/")) {
            return format!("https://{FA_CDN_HOST}/{rest}");
        }
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn secure_hosts() {
        let hosts = HostLists::default();
        assert!(hosts.is_secure("twitter.com"));
        assert!(hosts.is_secure("Twitter.com"));
        assert!(hosts.is_secure("someone.deviantart.com"));
        assert!(hosts.is_secure("deviantart.com"));
        assert!(!hosts.is_secure("notdeviantart.com"));
        assert!(!hosts.is_secure(".deviantart.com"));
        assert!(!hosts.is_secure("someone..deviantart.com"));
        assert!(!hosts.is_secure("example.com"));
    }

    #[test]
    fn configured_hosts_are_merged() {
        let hosts = HostLists::from_config(&DomainLists {
            secure: vec!["Example.com".to_string()],
            secure_suffixes: vec!["itch.io".to_string()],
            twitter_mirrors: vec!["fixupx.com".to_string()],
        });
        assert!(hosts.is_secure("example.com"));
        assert!(hosts.is_secure("artist.itch.io"));
        assert!(hosts.is_twitter_mirror("fixupx.com"));
        assert!(hosts.is_twitter_mirror("vxtwitter.com"));
    }

    #[test]
    fn direct_link_cleaning() {
        assert_eq!(
            clean_direct_link("http://d.facdn.net/art/a/1/a.png"),
            "https://d.furaffinity.net/art/a/1/a.png"
        );
        assert_eq!(
            clean_direct_link("https://d2.facdn.net/art/a/1/a.png"),
            "https://d.furaffinity.net/art/a/1/a.png"
        );
        assert_eq!(
            clean_direct_link("https://pbs.twimg.com/media/X?format=jpg"),
            "https://pbs.twimg.com/media/X?format=jpg"
        );
    }
}
