//! AsciiDoc renderer.
//!
//! Serializes a transformed [`Document`] into AsciiDoc text. Output is
//! deterministic and has no trailing newline.

mod block;
mod context;
mod escape;
mod inline;
mod strategy;
mod wrap;

use context::Context;
use mdadoc_core::{ConversionOptions, Document};
use strategy::RenderStrategy;

/// Renders a document as AsciiDoc.
pub fn render(document: &Document, options: &ConversionOptions) -> String {
    let strategy = RenderStrategy::from(options);
    let mut ctx = Context::new(&strategy);
    let out = ctx.blocks(&document.blocks);
    log::trace!("rendered {} blocks", document.blocks.len());
    out
}
