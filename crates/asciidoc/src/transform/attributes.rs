use super::{TransformContext, upsert};
use mdadoc_core::{AttributeEntry, Block, Document};

pub(super) fn insert_header(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let front_matter = ctx
        .front_matter
        .map(|front| front.attributes.as_slice())
        .unwrap_or_default();

    let mut entries: Vec<AttributeEntry> = Vec::new();
    for entry in ctx
        .generated
        .iter()
        .chain(front_matter)
        .chain(&ctx.options.attributes)
    {
        upsert(&mut entries, entry.clone());
    }
    if entries.is_empty() {
        return;
    }

    let at = usize::from(document.title().is_some());
    document
        .blocks
        .splice(at..at, entries.into_iter().map(Block::AttributeEntry));
}
