//! Conversion options shared by every stage of the pipeline.

use crate::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Markdown dialect accepted by the parser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// CommonMark plus GitHub extensions (tables, strikethrough, task lists,
    /// autolink literals, footnotes).
    #[default]
    Markdown,
    /// Strict CommonMark.
    CommonMark,
}

/// How paragraph and list-item text is laid out in the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// Keep the source line breaks.
    #[default]
    Preserve,
    /// Emit each block on a single line.
    None,
    /// One sentence per line.
    Ventilate,
    /// Re-flow to the given column width.
    Width(usize),
}

/// A document attribute entry, `:name: value` or `:name:` in AsciiDoc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    /// Attribute name.
    pub name: String,
    /// Attribute value; `None` sets the attribute without a value.
    #[serde(default)]
    pub value: Option<String>,
}

impl AttributeEntry {
    /// Entry with a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Entry that only sets the attribute.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Whether `name` is usable as an AsciiDoc attribute name.
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphanumeric() || first == '_' => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    }
}

impl FromStr for AttributeEntry {
    type Err = ConvertError;

    /// Parses `name=value` or a bare `name`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (name, value) = match input.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
            None => (input.trim(), None),
        };
        if !Self::is_valid_name(name) {
            return Err(ConvertError::invalid_option(
                "attributes",
                format!("`{name}` is not a valid attribute name"),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }
}

impl fmt::Display for AttributeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) if !value.is_empty() => write!(f, ":{}: {}", self.name, value),
            _ => write!(f, ":{}:", self.name),
        }
    }
}

/// Options controlling a single conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Source dialect.
    pub format: SourceFormat,
    /// Added to every heading level before clamping to 1..=6.
    pub heading_offset: i8,
    /// Generate ids for headings that have none.
    pub auto_ids: bool,
    /// Prefix for generated ids.
    pub auto_id_prefix: String,
    /// Word separator for generated ids.
    pub auto_id_separator: String,
    /// Drop explicit ids that equal the generated one.
    pub lazy_ids: bool,
    /// Text layout of paragraphs and list items.
    pub wrap: WrapMode,
    /// Image directory stripped from image paths.
    pub imagesdir: Option<String>,
    /// Emit bare URLs when the link text is the URL itself.
    pub auto_links: bool,
    /// Convert simple inline HTML to native markup.
    pub html_to_native: bool,
    /// Code block languages rendered as diagram blocks.
    pub diagram_languages: BTreeSet<String>,
    /// Extra header attributes, applied last.
    pub attributes: Vec<AttributeEntry>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            format: SourceFormat::Markdown,
            heading_offset: 0,
            auto_ids: false,
            auto_id_prefix: "_".to_string(),
            auto_id_separator: "-".to_string(),
            lazy_ids: false,
            wrap: WrapMode::Preserve,
            imagesdir: None,
            auto_links: true,
            html_to_native: true,
            diagram_languages: ["mermaid", "plantuml"]
                .into_iter()
                .map(String::from)
                .collect(),
            attributes: Vec::new(),
        }
    }
}

impl ConversionOptions {
    /// Deserialize options from a JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        serde_json::from_str(json)
            .map_err(|err| ConvertError::invalid_option("options", err.to_string()))
    }

    /// Reject option values that cannot produce a meaningful conversion.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.wrap == WrapMode::Width(0) {
            return Err(ConvertError::invalid_option(
                "wrap",
                "width must be greater than zero",
            ));
        }
        if self.auto_id_prefix.chars().any(char::is_whitespace) {
            return Err(ConvertError::invalid_option(
                "autoIdPrefix",
                "must not contain whitespace",
            ));
        }
        if self.auto_id_separator.chars().any(char::is_whitespace) {
            return Err(ConvertError::invalid_option(
                "autoIdSeparator",
                "must not contain whitespace",
            ));
        }
        for language in &self.diagram_languages {
            let valid = !language.is_empty()
                && language
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+' | '.'));
            if !valid {
                return Err(ConvertError::invalid_option(
                    "diagramLanguages",
                    format!("`{language}` is not a valid language token"),
                ));
            }
        }
        for entry in &self.attributes {
            if !AttributeEntry::is_valid_name(&entry.name) {
                return Err(ConvertError::invalid_option(
                    "attributes",
                    format!("`{}` is not a valid attribute name", entry.name),
                ));
            }
        }
        Ok(())
    }

    /// Whether a code block language is rendered as a diagram.
    pub fn is_diagram_language(&self, language: &str) -> bool {
        self.diagram_languages
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(language))
    }
}
