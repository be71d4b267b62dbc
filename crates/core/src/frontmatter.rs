use crate::AttributeEntry;
use serde_yaml::Value as YamlValue;
use thiserror::Error;

/// Metadata carried by a leading YAML block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Value of the `title` field when it is a non-empty string.
    pub title: Option<String>,
    /// Remaining scalar fields in source order.
    pub attributes: Vec<AttributeEntry>,
}

/// Result returned after extracting front matter from a document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed front matter.
    pub front_matter: FrontMatter,
    /// Byte offset inside the input where the body begins.
    pub body_start: usize,
}

/// Errors emitted while parsing or extracting front matter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extracts a YAML block that opens on the first line of `input`.
///
/// Expects newline-normalized text. Returns `Ok(None)` when the first line is
/// not a `---` fence.
pub fn extract_front_matter(
    input: &str,
) -> Result<Option<FrontmatterExtraction>, FrontmatterError> {
    let Some((block, body_start)) = find_yaml_block(input)? else {
        return Ok(None);
    };
    let front_matter = parse_yaml_block(block)?;
    Ok(Some(FrontmatterExtraction {
        front_matter,
        body_start,
    }))
}

fn parse_yaml_block(block: &str) -> Result<FrontMatter, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let value: YamlValue =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let mapping = match value {
        YamlValue::Null => return Ok(FrontMatter::default()),
        YamlValue::Mapping(mapping) => mapping,
        _ => return Err(FrontmatterError::InvalidRootType),
    };

    let mut front_matter = FrontMatter::default();
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            log::debug!("Skipping front matter field with non-string key: {key:?}");
            continue;
        };
        if key == "title" {
            match value {
                YamlValue::String(title) if !title.trim().is_empty() => {
                    front_matter.title = Some(title.trim().to_string());
                }
                other => log::debug!("Ignoring non-string front matter title: {other:?}"),
            }
            continue;
        }
        if !AttributeEntry::is_valid_name(key) {
            log::debug!("Skipping front matter field `{key}`: not a valid attribute name");
            continue;
        }
        let entry = match value {
            YamlValue::String(text) => AttributeEntry::new(key, text),
            YamlValue::Number(number) => AttributeEntry::new(key, number.to_string()),
            YamlValue::Bool(true) | YamlValue::Null => AttributeEntry::flag(key),
            YamlValue::Bool(false) => continue,
            _ => {
                log::debug!("Skipping front matter field `{key}`: not a scalar");
                continue;
            }
        };
        front_matter.attributes.push(entry);
    }
    Ok(front_matter)
}

fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let Some((first, block_start)) = next_line(input, 0) else {
        return Ok(None);
    };
    if !is_yaml_fence(first) {
        return Ok(None);
    }

    let mut scan_cursor = block_start;
    while let Some((line, next_cursor)) = next_line(input, scan_cursor) {
        if is_yaml_fence(line) {
            let block = input[block_start..scan_cursor].trim_end_matches('\n');
            return Ok(Some((block, next_cursor)));
        }
        scan_cursor = next_cursor;
    }
    Err(FrontmatterError::Unterminated)
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    match input[start..].find('\n') {
        Some(pos) => Some((&input[start..start + pos], start + pos + 1)),
        None => Some((&input[start..], input.len())),
    }
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> FrontmatterExtraction {
        extract_front_matter(input)
            .expect("frontmatter extraction should succeed")
            .expect("frontmatter should be present")
    }

    #[test]
    fn returns_none_without_fence() {
        let result = extract_front_matter("# Title\nBody").expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn fence_must_open_the_document() {
        let result = extract_front_matter("Intro\n---\ntitle: x\n---").expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn parses_basic_yaml() {
        let input = "---\ntitle: Example\ntags:\n  - rust\n  - docs\n---\n# Content";
        let result = extract(input);
        assert_eq!(&input[result.body_start..], "# Content");
        assert_eq!(result.front_matter.title.as_deref(), Some("Example"));
        assert!(result.front_matter.attributes.is_empty());
    }

    #[test]
    fn scalars_become_attributes_in_order() {
        let input = "---\nauthor: Jane Doe\nversion: 2.1\ndraft: true\nhidden: false\nbad key: x\n---\nBody";
        let result = extract(input);
        assert_eq!(
            result.front_matter.attributes,
            vec![
                AttributeEntry::new("author", "Jane Doe"),
                AttributeEntry::new("version", "2.1"),
                AttributeEntry::flag("draft"),
            ]
        );
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let result = extract(input);
        assert_eq!(result.front_matter, FrontMatter::default());
        assert_eq!(&input[result.body_start..], "# Body");
    }

    #[test]
    fn empty_title_is_ignored() {
        let result = extract("---\ntitle: ''\n---\nBody");
        assert_eq!(result.front_matter.title, None);
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let input = "---\ninvalid: [unterminated\n---\n";
        let err = extract_front_matter(input).unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn errors_on_sequence_root() {
        let err = extract_front_matter("---\n- a\n- b\n---\nBody").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType));
    }

    #[test]
    fn errors_on_unterminated_block() {
        let input = "---\ntitle: test";
        let err = extract_front_matter(input).unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }
}
