//! Misuse rules: source fields holding something other than one link

use crate::rule::{ListRule, TextRule};
use regex::Regex;
use sourcelint_core::{MisuseThresholds, RuleFault, RuleId, ScanStats, SourceMatch, SourceUrl};

/// Two links run together on one line
#[derive(Debug, Clone, Default)]
pub struct TwoUrlsOnOneLine;

impl TextRule for TwoUrlsOnOneLine {
    fn id(&self) -> RuleId {
        RuleId::TwoUrlsOnOneLine
    }

    fn check_text(
        &self,
        source: &str,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        let url = SourceUrl::decompose(source);
        match url.path.as_deref() {
            Some(path) if path.contains("://") => Ok(Some(SourceMatch::new(
                self.id(),
                post_id,
                source,
                "Two URLs seem to be on the same line",
            ))),
            _ => Ok(None),
        }
    }
}

/// Several single-word values separated by `", "`
#[derive(Debug, Clone, Default)]
pub struct CommaSeparated;

impl TextRule for CommaSeparated {
    fn id(&self) -> RuleId {
        RuleId::CommaSeparated
    }

    fn check_text(
        &self,
        source: &str,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if !source.contains(", ") || source.split(", ").any(|part| part.contains(' ')) {
            return Ok(None);
        }
        Ok(Some(SourceMatch::new(
            self.id(),
            post_id,
            source,
            "Having a comma in the source indicates it's probably formatted wrong",
        )))
    }
}

/// Long run of lower-case words with no commas
#[derive(Debug, Clone)]
pub struct TagList {
    min_length: usize,
}

impl TagList {
    pub fn new(thresholds: &MisuseThresholds) -> Self {
        Self {
            min_length: thresholds.tags_min_length,
        }
    }
}

impl TextRule for TagList {
    fn id(&self) -> RuleId {
        RuleId::TagList
    }

    fn check_text(
        &self,
        source: &str,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if !source.contains(' ') || source.contains(',') || source.chars().count() < self.min_length {
            return Ok(None);
        }
        if source.split(' ').any(|word| word.to_lowercase() != word) {
            return Ok(None);
        }
        Ok(Some(SourceMatch::new(
            self.id(),
            post_id,
            source,
            "Looks like this source might be a list of tags?",
        )))
    }
}

/// Long string with spaces, probably a message
#[derive(Debug, Clone)]
pub struct FreeText {
    min_length: usize,
}

impl FreeText {
    pub fn new(thresholds: &MisuseThresholds) -> Self {
        Self {
            min_length: thresholds.text_min_length,
        }
    }
}

impl TextRule for FreeText {
    fn id(&self) -> RuleId {
        RuleId::FreeText
    }

    fn check_text(
        &self,
        source: &str,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if !source.contains(' ') || source.chars().count() < self.min_length {
            return Ok(None);
        }
        Ok(Some(SourceMatch::new(
            self.id(),
            post_id,
            source,
            "Seems like this source is just a message, maybe?",
        )))
    }
}

/// Email addresses listed next to real sources
///
/// A post whose every source is an email is left alone.
#[derive(Debug, Clone, Default)]
pub struct EmailAddress;

impl ListRule for EmailAddress {
    fn id(&self) -> RuleId {
        RuleId::EmailAddress
    }

    fn check_list(
        &self,
        sources: &[SourceUrl],
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Vec<SourceMatch>, RuleFault> {
        let emails: Vec<&SourceUrl> = sources.iter().filter(|s| s.raw.contains('@')).collect();
        if emails.len() == sources.len() {
            return Ok(Vec::new());
        }
        Ok(emails
            .into_iter()
            .map(|email| {
                SourceMatch::new(self.id(), post_id, &email.raw, "Email address listed as a source")
            })
            .collect())
    }
}

/// Path on the uploader's disk (`./art.png`, `C:\art.png`)
#[derive(Debug, Clone)]
pub struct LocalPath {
    pattern: Regex,
}

impl LocalPath {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"^(\./|[A-Za-z]:[/\\])")?,
        })
    }
}

impl TextRule for LocalPath {
    fn id(&self) -> RuleId {
        RuleId::LocalPath
    }

    fn check_text(
        &self,
        source: &str,
        post_id: &str,
        _stats: &mut ScanStats,
    ) -> Result<Option<SourceMatch>, RuleFault> {
        if !self.pattern.is_match(source) {
            return Ok(None);
        }
        Ok(Some(SourceMatch::new(
            self.id(),
            post_id,
            source,
            "Source is a path on the uploader's computer",
        )))
    }
}
