//! Rule identity registry
//!
//! IMPORTANT: Rule ids are versioned and stable.
//! They key reports and persisted results, so NEVER rename or remove an id.
//! Add new ids with new names only.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a rule consumes a post's source list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleShape {
    /// Sees every source of the post at once
    List,

    /// Sees one raw source string at a time
    Text,

    /// Sees one decomposed source at a time, skipped when there is no domain
    Url,
}

impl std::fmt::Display for RuleShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Text => write!(f, "text"),
            Self::Url => write!(f, "url"),
        }
    }
}

/// Rule id registry (v1)
///
/// These ids are STABLE and VERSIONED.
/// Do NOT rename or remove ids - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RuleId {
    // protocols
    /// Link has no protocol at all
    MissingProtocol,

    /// Protocol lost its first characters ("ttps://")
    BrokenProtocol,

    /// Protocol is not one we recognise
    UnknownProtocol,

    /// Plain http on a host that serves https
    InsecureProtocol,

    // formatting
    /// Unencoded spaces in the path
    SpacesInUrl,

    /// Domain was capitalised by a phone keyboard
    TitlecaseDomain,

    // misuse
    /// Two links pasted on the same line
    TwoUrlsOnOneLine,

    /// Several links separated by commas in one field
    CommaSeparated,

    /// Looks like a pasted tag list
    TagList,

    /// Looks like a free text message
    FreeText,

    /// Email address among real links
    EmailAddress,

    /// Path on the uploader's own disk
    LocalPath,

    // deviantart
    /// `<user>.deviantart.com` subdomain profile link
    OldFormatUserPage,

    // furaffinity
    /// Link to a single comment rather than the submission
    CommentsLink,

    /// Legacy CDN host that still resolves
    OldCdn,

    /// Legacy CDN host that no longer resolves
    BrokenCdn,

    /// Profile or gallery link without the submission link
    UserLinkWithoutSubmission,

    /// Direct file link without the submission link
    DirectLinkWithoutSubmission,

    // inkbunny
    /// Unnecessary anchor on an inkbunny link
    AnchorTag,

    // twitter
    /// Link through a twitter mirror or embed-fixing proxy
    MirrorDomain,

    /// Tracking parameters on a tweet link
    TrackingParams,

    /// Direct image link in the legacy `name.ext:size` layout
    OldDirectUrl,

    /// Direct image link mangled by an earlier automated fix
    MalformedDirectLink,

    /// Mobile subdomain link
    MobileLink,

    /// Profile link without the status link
    GalleryWithoutStatus,

    /// Direct image link without the status link
    DirectLinkWithoutStatus,
}

impl RuleId {
    /// Every registered rule id, in declaration order
    pub const ALL: [RuleId; 26] = [
        Self::MissingProtocol,
        Self::BrokenProtocol,
        Self::UnknownProtocol,
        Self::InsecureProtocol,
        Self::SpacesInUrl,
        Self::TitlecaseDomain,
        Self::TwoUrlsOnOneLine,
        Self::CommaSeparated,
        Self::TagList,
        Self::FreeText,
        Self::EmailAddress,
        Self::LocalPath,
        Self::OldFormatUserPage,
        Self::CommentsLink,
        Self::OldCdn,
        Self::BrokenCdn,
        Self::UserLinkWithoutSubmission,
        Self::DirectLinkWithoutSubmission,
        Self::AnchorTag,
        Self::MirrorDomain,
        Self::TrackingParams,
        Self::OldDirectUrl,
        Self::MalformedDirectLink,
        Self::MobileLink,
        Self::GalleryWithoutStatus,
        Self::DirectLinkWithoutStatus,
    ];

    /// Module (site or concern) the rule belongs to
    pub fn module(&self) -> &'static str {
        match self {
            Self::MissingProtocol
            | Self::BrokenProtocol
            | Self::UnknownProtocol
            | Self::InsecureProtocol => "protocols",
            Self::SpacesInUrl | Self::TitlecaseDomain => "formatting",
            Self::TwoUrlsOnOneLine
            | Self::CommaSeparated
            | Self::TagList
            | Self::FreeText
            | Self::EmailAddress
            | Self::LocalPath => "misuse",
            Self::OldFormatUserPage => "deviantart",
            Self::CommentsLink
            | Self::OldCdn
            | Self::BrokenCdn
            | Self::UserLinkWithoutSubmission
            | Self::DirectLinkWithoutSubmission => "furaffinity",
            Self::AnchorTag => "inkbunny",
            Self::MirrorDomain
            | Self::TrackingParams
            | Self::OldDirectUrl
            | Self::MalformedDirectLink
            | Self::MobileLink
            | Self::GalleryWithoutStatus
            | Self::DirectLinkWithoutStatus => "twitter",
        }
    }

    /// Rule name within its module
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingProtocol => "MissingProtocol",
            Self::BrokenProtocol => "BrokenProtocol",
            Self::UnknownProtocol => "UnknownProtocol",
            Self::InsecureProtocol => "InsecureProtocol",
            Self::SpacesInUrl => "SpacesInUrl",
            Self::TitlecaseDomain => "TitlecaseDomain",
            Self::TwoUrlsOnOneLine => "TwoUrlsOnOneLine",
            Self::CommaSeparated => "CommaSeparated",
            Self::TagList => "TagList",
            Self::FreeText => "FreeText",
            Self::EmailAddress => "EmailAddress",
            Self::LocalPath => "LocalPath",
            Self::OldFormatUserPage => "OldFormatUserPage",
            Self::CommentsLink => "CommentsLink",
            Self::OldCdn => "OldCdn",
            Self::BrokenCdn => "BrokenCdn",
            Self::UserLinkWithoutSubmission => "UserLinkWithoutSubmission",
            Self::DirectLinkWithoutSubmission => "DirectLinkWithoutSubmission",
            Self::AnchorTag => "AnchorTag",
            Self::MirrorDomain => "MirrorDomain",
            Self::TrackingParams => "TrackingParams",
            Self::OldDirectUrl => "OldDirectUrl",
            Self::MalformedDirectLink => "MalformedDirectLink",
            Self::MobileLink => "MobileLink",
            Self::GalleryWithoutStatus => "GalleryWithoutStatus",
            Self::DirectLinkWithoutStatus => "DirectLinkWithoutStatus",
        }
    }

    /// Get the rule id as a stable string identifier (`module.Name`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingProtocol => "protocols.MissingProtocol",
            Self::BrokenProtocol => "protocols.BrokenProtocol",
            Self::UnknownProtocol => "protocols.UnknownProtocol",
            Self::InsecureProtocol => "protocols.InsecureProtocol",
            Self::SpacesInUrl => "formatting.SpacesInUrl",
            Self::TitlecaseDomain => "formatting.TitlecaseDomain",
            Self::TwoUrlsOnOneLine => "misuse.TwoUrlsOnOneLine",
            Self::CommaSeparated => "misuse.CommaSeparated",
            Self::TagList => "misuse.TagList",
            Self::FreeText => "misuse.FreeText",
            Self::EmailAddress => "misuse.EmailAddress",
            Self::LocalPath => "misuse.LocalPath",
            Self::OldFormatUserPage => "deviantart.OldFormatUserPage",
            Self::CommentsLink => "furaffinity.CommentsLink",
            Self::OldCdn => "furaffinity.OldCdn",
            Self::BrokenCdn => "furaffinity.BrokenCdn",
            Self::UserLinkWithoutSubmission => "furaffinity.UserLinkWithoutSubmission",
            Self::DirectLinkWithoutSubmission => "furaffinity.DirectLinkWithoutSubmission",
            Self::AnchorTag => "inkbunny.AnchorTag",
            Self::MirrorDomain => "twitter.MirrorDomain",
            Self::TrackingParams => "twitter.TrackingParams",
            Self::OldDirectUrl => "twitter.OldDirectUrl",
            Self::MalformedDirectLink => "twitter.MalformedDirectLink",
            Self::MobileLink => "twitter.MobileLink",
            Self::GalleryWithoutStatus => "twitter.GalleryWithoutStatus",
            Self::DirectLinkWithoutStatus => "twitter.DirectLinkWithoutStatus",
        }
    }

    /// Input shape the rule commits to
    pub fn shape(&self) -> RuleShape {
        match self {
            Self::EmailAddress
            | Self::UserLinkWithoutSubmission
            | Self::DirectLinkWithoutSubmission
            | Self::GalleryWithoutStatus
            | Self::DirectLinkWithoutStatus => RuleShape::List,
            Self::TwoUrlsOnOneLine
            | Self::CommaSeparated
            | Self::TagList
            | Self::FreeText
            | Self::LocalPath => RuleShape::Text,
            _ => RuleShape::Url,
        }
    }

    /// Heading for the end-of-scan statistics of rules that collect any
    pub fn report_label(&self) -> Option<&'static str> {
        match self {
            Self::MissingProtocol => Some("Domains without protocols seen"),
            Self::UnknownProtocol => Some("Unknown protocols"),
            Self::InsecureProtocol => Some("Other http domains seen"),
            Self::TitlecaseDomain => Some("Titlecase domain counter"),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<RuleId> for String {
    fn from(id: RuleId) -> Self {
        id.as_str().to_string()
    }
}

/// Error for a rule id string that is not in the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rule id: {0}")]
pub struct UnknownRuleId(pub String);

impl FromStr for RuleId {
    type Err = UnknownRuleId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownRuleId(s.to_string()))
    }
}

impl TryFrom<String> for RuleId {
    type Error = UnknownRuleId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_id_stability() {
        // Ensure ids are stable strings
        assert_eq!(RuleId::MissingProtocol.as_str(), "protocols.MissingProtocol");
        assert_eq!(RuleId::OldCdn.as_str(), "furaffinity.OldCdn");
        assert_eq!(RuleId::OldDirectUrl.as_str(), "twitter.OldDirectUrl");
    }

    #[test]
    fn as_str_is_module_and_name() {
        for id in RuleId::ALL {
            assert_eq!(id.as_str(), format!("{}.{}", id.module(), id.name()));
        }
    }

    #[test]
    fn parse_round_trips_every_id() {
        for id in RuleId::ALL {
            assert_eq!(id.as_str().parse::<RuleId>(), Ok(id));
        }
        assert!("protocols.Nope".parse::<RuleId>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&RuleId::TagList).unwrap();
        assert_eq!(json, "\"misuse.TagList\"");
        let back: RuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RuleId::TagList);
    }
}
