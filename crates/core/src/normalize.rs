//! Source text normalization and front matter detection.

use crate::frontmatter::{FrontMatter, extract_front_matter};

/// Normalized body text plus any front matter removed from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedSource {
    /// Body text with LF line endings, no trailing whitespace and no
    /// leading or trailing blank lines.
    pub text: String,
    /// Front matter found at the top of the document.
    pub front_matter: Option<FrontMatter>,
}

/// Normalizes line endings and whitespace. Idempotent.
pub fn normalize_whitespace(input: &str) -> String {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<&str> = unified.lines().map(str::trim_end).collect();
    let start = lines
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(start, |idx| idx + 1);

    lines[start..end].join("\n")
}

/// Normalizes `raw` and strips a leading front matter block.
///
/// A block that cannot be read as a YAML mapping is not front matter and
/// stays in the body.
pub fn normalize(raw: &str) -> NormalizedSource {
    let text = normalize_whitespace(raw);
    match extract_front_matter(&text) {
        Ok(Some(extraction)) => NormalizedSource {
            text: normalize_whitespace(&text[extraction.body_start..]),
            front_matter: Some(extraction.front_matter),
        },
        Ok(None) => NormalizedSource {
            text,
            front_matter: None,
        },
        Err(err) => {
            log::debug!("Leading `---` block is not front matter: {err}");
            NormalizedSource {
                text,
                front_matter: None,
            }
        }
    }
}
