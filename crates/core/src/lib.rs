#![deny(missing_docs)]
//! mdadoc core: conversion options, source normalization, front matter,
//! the document tree and the markdown-rs parser adapter.

/// Core error types.
pub mod error;
/// YAML front matter extraction.
pub mod frontmatter;
/// Source text normalization.
pub mod normalize;
/// Conversion options.
pub mod options;
/// Markdown parsing and MDAST lowering.
pub mod parse;
/// Heading id and slug utilities.
pub mod slug;
/// Document tree.
pub mod tree;

pub use error::{ConvertError, SourceLocation};
pub use frontmatter::{FrontMatter, FrontmatterError, FrontmatterExtraction, extract_front_matter};
pub use normalize::{NormalizedSource, normalize, normalize_whitespace};
pub use options::{AttributeEntry, ConversionOptions, SourceFormat, WrapMode};
pub use parse::{ParseOptions, parse, parse_mdast};
pub use slug::{HeadingIdRegistry, Slugger, extract_custom_id, generate_id, native_id, slugify};
pub use tree::{
    Admonition, AdmonitionKind, Alignment, Block, Cell, CodeBlock, Document, Heading, Inline,
    List, ListItem, ListKind, Table, plain_text,
};
