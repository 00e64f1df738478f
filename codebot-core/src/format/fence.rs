use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::markdown::escape_markdown_v2;

/// Language tags accepted after an opening fence. A fence without a tag matches too.
pub const RECOGNIZED_LANGUAGES: &[&str] = &[
    "python", "py", "go", "java", "javascript", "js", "c++", "cpp", "c", "html", "css", "php",
    "ruby", "rust", "shell", "bash", "zsh", "yaml", "json", "sql", "markdown", "txt", "xml",
    "diff",
];

/// Label used on re-wrapped fences unless configured otherwise.
pub const DEFAULT_FENCE_LANGUAGE: &str = "python";

static FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let languages = RECOGNIZED_LANGUAGES
        .iter()
        .map(|lang| regex::escape(lang))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?s)```({})?\n(.*?)\n```", languages))
        .expect("fence pattern is a valid regex")
});

/// How re-wrapped code blocks are labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceLabel {
    /// Every block gets the same language tag, whatever the model wrote.
    Fixed(String),
    /// Keep the tag from the model's fence; untagged fences stay untagged.
    Preserve,
}

impl Default for FenceLabel {
    fn default() -> Self {
        FenceLabel::Fixed(DEFAULT_FENCE_LANGUAGE.to_string())
    }
}

impl FenceLabel {
    fn resolve<'a>(&'a self, tag: Option<&'a str>) -> &'a str {
        match self {
            FenceLabel::Fixed(label) => label,
            FenceLabel::Preserve => tag.unwrap_or(""),
        }
    }
}

impl From<&str> for FenceLabel {
    /// `"preserve"` keeps the model's tags; anything else is used as a fixed tag.
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("preserve") {
            FenceLabel::Preserve
        } else {
            FenceLabel::Fixed(s.to_string())
        }
    }
}

impl FromStr for FenceLabel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FenceLabel::from(s))
    }
}

impl fmt::Display for FenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenceLabel::Fixed(label) => write!(f, "{}", label),
            FenceLabel::Preserve => write!(f, "preserve"),
        }
    }
}

/// A fenced segment found in raw model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// Tag written after the opening fence, if any.
    pub language: Option<&'a str>,
    /// Text between the fences, untrimmed.
    pub body: &'a str,
}

impl CodeBlock<'_> {
    /// Wraps the trimmed body in a fence tagged according to `label`.
    pub fn render(&self, label: &FenceLabel) -> String {
        format!("```{}\n{}\n```", label.resolve(self.language), self.body.trim())
    }
}

/// Finds every fenced segment in `text`, in order of appearance.
pub fn find_code_blocks(text: &str) -> Vec<CodeBlock<'_>> {
    FENCE_PATTERN
        .captures_iter(text)
        .map(|cap| CodeBlock {
            language: cap.get(1).map(|m| m.as_str()),
            body: cap.get(2).map_or("", |m| m.as_str()),
        })
        .collect()
}

/// Turns raw model output into MarkdownV2-ready text.
///
/// When the output contains fenced code, only the code is kept: each block is
/// trimmed, re-fenced and the blocks are joined with a blank line. Code is not
/// escaped. When there is no fence the whole text is escaped as prose.
pub fn extract_code_blocks(text: &str, label: &FenceLabel) -> String {
    let blocks = find_code_blocks(text);

    if blocks.is_empty() {
        warn!("No code blocks found in model response, returning escaped text");
        return escape_markdown_v2(text);
    }

    blocks
        .iter()
        .map(|block| block.render(label))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_single_block() {
        let blocks = find_code_blocks("Here:\n```python\nprint(1)\n```\nDone.");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, Some("python"));
        assert_eq!(blocks[0].body, "print(1)");
    }

    #[test]
    fn test_find_untagged_block() {
        let blocks = find_code_blocks("```\nx = 1\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, None);
    }

    #[test]
    fn test_fence_without_newline_before_close_is_ignored() {
        assert!(find_code_blocks("```python\nprint(1)```").is_empty());
    }

    #[test]
    fn test_unrecognized_tag_is_not_a_fence() {
        assert!(find_code_blocks("```kotlin\nval x = 1\n```").is_empty());
    }

    #[test]
    fn test_fence_label_from_str() {
        assert_eq!("preserve".parse::<FenceLabel>().unwrap(), FenceLabel::Preserve);
        assert_eq!(
            "rust".parse::<FenceLabel>().unwrap(),
            FenceLabel::Fixed("rust".to_string())
        );
        assert_eq!(FenceLabel::default().to_string(), "python");
    }
}
