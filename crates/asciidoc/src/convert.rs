//! Markdown to AsciiDoc conversion entry point.

use crate::renderer::render;
use crate::transform::transform;
use mdadoc_core::{ConversionOptions, ConvertError, ParseOptions, normalize, parse};

/// Converts Markdown source to AsciiDoc.
///
/// Options are validated first; an invalid configuration fails before any
/// input is read. Content anomalies never fail the conversion.
///
/// # Example
///
/// ```
/// use mdadoc_asciidoc::convert;
/// use mdadoc_core::ConversionOptions;
///
/// let adoc = convert("# Heading\n\nBody content.", &ConversionOptions::default()).unwrap();
/// assert_eq!(adoc, "= Heading\n\nBody content.");
/// ```
pub fn convert(raw: &str, options: &ConversionOptions) -> Result<String, ConvertError> {
    options.validate()?;
    let source = normalize(raw);
    let document = parse(&source.text, ParseOptions::from(options))?;
    let document = transform(document, options, source.front_matter.as_ref());
    Ok(render(&document, options))
}
