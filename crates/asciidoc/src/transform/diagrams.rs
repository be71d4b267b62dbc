use super::TransformContext;
use mdadoc_core::{Block, Document};

pub(super) fn flag_diagrams(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let options = ctx.options;
    document.walk_blocks_mut(&mut |block| {
        if let Block::CodeBlock(code) = block
            && let Some(language) = code.language.as_deref()
        {
            code.diagram = options.is_diagram_language(language);
        }
    });
}
