//! Structural decomposition of raw source strings
//!
//! No validation, decoding or case folding happens here. Malformed input is
//! passed through as-is so rules can see and report exactly what is wrong.

use crate::error::RuleFault;
use serde::{Deserialize, Serialize};

/// A raw source string split into protocol, domain and path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceUrl {
    /// Original input, always kept for exact output
    pub raw: String,

    /// Text before the first `://`
    pub protocol: Option<String>,

    /// Text between the protocol and the next `/`
    pub domain: Option<String>,

    /// Everything after the domain's `/`
    pub path: Option<String>,
}

impl SourceUrl {
    /// Decompose a raw source string. Never fails.
    pub fn decompose(raw: &str) -> Self {
        let (protocol, rest) = match raw.split_once("://") {
            Some((protocol, rest)) => (Some(protocol.to_string()), rest),
            None => (None, raw),
        };

        let (domain, path) = match rest.split_once('/') {
            Some((domain, path)) => (Some(domain.to_string()), Some(path.to_string())),
            None => (None, None),
        };

        Self {
            raw: raw.to_string(),
            protocol,
            domain,
            path,
        }
    }

    /// Domain with a leading `www.` removed
    pub fn domain_clean(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.strip_prefix("www.").unwrap_or(domain))
    }

    /// Protocol, treating an empty protocol as no protocol
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref().filter(|p| !p.is_empty())
    }

    /// Domain, or a fault when a rule runs on a domain-less source
    pub fn require_domain(&self) -> Result<&str, RuleFault> {
        self.domain.as_deref().ok_or_else(|| RuleFault::MissingField {
            field: "domain",
            raw: self.raw.clone(),
        })
    }

    /// Path, or a fault when a rule runs on a domain-less source
    pub fn require_path(&self) -> Result<&str, RuleFault> {
        self.path.as_deref().ok_or_else(|| RuleFault::MissingField {
            field: "path",
            raw: self.raw.clone(),
        })
    }

    /// Rebuild the link as `protocol://domain/path`, leaving out the protocol if there is none
    pub fn rebuild(&self, domain: &str, path: &str) -> String {
        match self.protocol() {
            Some(protocol) => format!("{protocol}://{domain}/{path}"),
            None => format!("{domain}/{path}"),
        }
    }
}

impl std::fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
