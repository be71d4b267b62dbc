//! Tree transformations applied between parsing and rendering.
//!
//! Passes run in a fixed order and share one [`TransformContext`]:
//!
//! - `toc`: replaces TOC marker comment pairs with a `toc::[]` block.
//! - `html`: folds simple inline HTML into native nodes.
//! - `admonitions`: turns GitHub alert quotes into admonition blocks.
//! - `headings`: heading offset, document title and id assignment.
//! - `xref`: resolves `#fragment` links against heading ids.
//! - `images`: strips the images directory from image paths.
//! - `diagrams`: flags diagram code blocks.
//! - `attributes`: inserts the header attribute entries.

mod admonitions;
mod attributes;
mod diagrams;
mod headings;
mod html;
mod images;
mod toc;
mod xref;

use mdadoc_core::{AttributeEntry, ConversionOptions, Document, FrontMatter, HeadingIdRegistry};

/// AsciiDoc's built-in id prefix and separator.
pub(crate) const NATIVE_ID_PREFIX: &str = "_";
pub(crate) const NATIVE_ID_SEPARATOR: &str = "_";

/// State threaded through every transformation pass of one conversion.
#[derive(Debug)]
pub struct TransformContext<'a> {
    /// Options of the current conversion.
    pub options: &'a ConversionOptions,
    /// Front matter removed by the normalizer.
    pub front_matter: Option<&'a FrontMatter>,
    /// Heading ids assigned so far.
    pub ids: HeadingIdRegistry,
    /// Header attributes produced by the passes themselves.
    pub generated: Vec<AttributeEntry>,
    /// Prefix and separator AsciiDoc uses for headings left without an id.
    pub native_id_style: (String, String),
}

impl<'a> TransformContext<'a> {
    /// Fresh context for one conversion.
    pub fn new(options: &'a ConversionOptions, front_matter: Option<&'a FrontMatter>) -> Self {
        Self {
            options,
            front_matter,
            ids: HeadingIdRegistry::new(),
            generated: Vec::new(),
            native_id_style: (
                NATIVE_ID_PREFIX.to_string(),
                NATIVE_ID_SEPARATOR.to_string(),
            ),
        }
    }

    /// Adds a generated header attribute, replacing an earlier one of the same name.
    pub fn set_attribute(&mut self, entry: AttributeEntry) {
        upsert(&mut self.generated, entry);
    }
}

pub(crate) fn upsert(entries: &mut Vec<AttributeEntry>, entry: AttributeEntry) {
    match entries.iter_mut().find(|existing| existing.name == entry.name) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

type Pass = fn(&mut Document, &mut TransformContext<'_>);

const PASSES: &[(&str, Pass)] = &[
    ("toc", toc::replace_markers),
    ("html", html::fold_html),
    ("admonitions", admonitions::convert_alerts),
    ("heading-offset", headings::apply_offset),
    ("document-title", headings::insert_title),
    ("ids", headings::assign_ids),
    ("xref", xref::resolve_fragments),
    ("images", images::rewrite_paths),
    ("diagrams", diagrams::flag_diagrams),
    ("header-attributes", attributes::insert_header),
];

/// Runs every pass over `document`.
pub fn transform(
    mut document: Document,
    options: &ConversionOptions,
    front_matter: Option<&FrontMatter>,
) -> Document {
    let mut ctx = TransformContext::new(options, front_matter);
    for (name, pass) in PASSES {
        log::trace!("Running transform pass `{name}`");
        pass(&mut document, &mut ctx);
    }
    document
}
