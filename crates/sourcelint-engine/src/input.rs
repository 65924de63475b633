//! Post input: one `{"post_id", "source"}` JSON object per line
//!
//! `source` is the post's newline-separated source field.

use serde::Deserialize;
use sourcelint_core::SourceUrl;
use std::path::{Path, PathBuf};

/// Input error types
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// One post's sources, decomposed and in field order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSources {
    pub post_id: String,
    pub sources: Vec<SourceUrl>,
}

impl PostSources {
    /// Split a source field on newlines, dropping blank entries
    pub fn from_field(post_id: impl Into<String>, field: &str) -> Self {
        Self {
            post_id: post_id.into(),
            sources: field
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(SourceUrl::decompose)
                .collect(),
        }
    }

    /// Build from already separated raw sources
    pub fn from_sources<S: AsRef<str>>(post_id: impl Into<String>, sources: &[S]) -> Self {
        Self {
            post_id: post_id.into(),
            sources: sources.iter().map(|s| SourceUrl::decompose(s.as_ref())).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Raw source strings
    pub fn raw_sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.raw.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PostId {
    Text(String),
    Number(u64),
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        match id {
            PostId::Text(id) => id,
            PostId::Number(id) => id.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct InputLine {
    post_id: PostId,
    #[serde(default)]
    source: Option<String>,
}

/// Parse one input line (1-based `line` for messages)
///
/// Blank lines and posts with an empty source field come back as `None`.
pub fn parse_line(line: usize, text: &str) -> Result<Option<PostSources>, InputError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let parsed: InputLine = serde_json::from_str(text).map_err(|e| InputError::Malformed {
        line,
        message: e.to_string(),
    })?;

    let post = PostSources::from_field(String::from(parsed.post_id), parsed.source.as_deref().unwrap_or_default());
    if post.is_empty() {
        return Ok(None);
    }
    Ok(Some(post))
}

/// Parse a whole input, skipping (and logging) malformed lines
pub fn parse_jsonl(input: &str) -> Vec<PostSources> {
    let mut posts = Vec::new();
    for (index, text) in input.lines().enumerate() {
        match parse_line(index + 1, text) {
            Ok(Some(post)) => posts.push(post),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping input line"),
        }
    }
    posts
}

/// Read and parse an input file
pub fn read_jsonl(path: &Path) -> Result<Vec<PostSources>, InputError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let posts = parse_jsonl(&contents);
    tracing::info!(path = %path.display(), posts = posts.len(), "Loaded posts");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_splitting() {
        let post = PostSources::from_field("1", "https://a.com/x\n\n  https://b.com/y  \r\n   \n");
        assert_eq!(post.raw_sources().collect::<Vec<_>>(), vec!["https://a.com/x", "https://b.com/y"]);
    }

    #[test]
    fn numeric_post_ids() {
        let post = parse_line(1, r#"{"post_id": 42, "source": "https://a.com/x"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(post.post_id, "42");
    }

    #[test]
    fn blank_fields_are_skipped() {
        assert_eq!(parse_line(1, r#"{"post_id": "1", "source": "  \n "}"#).unwrap(), None);
        assert_eq!(parse_line(1, r#"{"post_id": "1"}"#).unwrap(), None);
        assert_eq!(parse_line(1, "   ").unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let input = concat!(
            "{\"post_id\": \"1\", \"source\": \"https://a.com/x\"}\n",
            "not json\n",
            "{\"post_id\": \"2\", \"source\": \"https://b.com/y\\nhttps://c.com/z\"}\n",
        );
        let posts = parse_jsonl(input);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].sources.len(), 2);

        let err = parse_line(2, "not json").unwrap_err();
        assert!(matches!(err, InputError::Malformed { line: 2, .. }));
    }
}
