use super::TransformContext;
use mdadoc_core::{Admonition, AdmonitionKind, Block, Document, Inline};

/// Removes a leading `[!KIND]` marker from the quote's first paragraph.
fn take_alert_marker(blocks: &mut Vec<Block>) -> Option<AdmonitionKind> {
    let Some(Block::Paragraph(inlines)) = blocks.first_mut() else {
        return None;
    };
    let Some(Inline::Text(text)) = inlines.first_mut() else {
        return None;
    };
    let (label, rest) = text.strip_prefix("[!")?.split_once(']')?;
    let kind = AdmonitionKind::from_label(label)?;
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }

    *text = rest.trim_start().to_string();
    if text.is_empty() {
        inlines.remove(0);
    }
    if matches!(inlines.first(), Some(Inline::LineBreak)) {
        inlines.remove(0);
    }
    if inlines.is_empty() {
        blocks.remove(0);
    }
    Some(kind)
}

pub(super) fn convert_alerts(document: &mut Document, _ctx: &mut TransformContext<'_>) {
    document.walk_blocks_mut(&mut |block| {
        let Block::BlockQuote(children) = block else {
            return;
        };
        let Some(kind) = take_alert_marker(children) else {
            return;
        };
        let blocks = std::mem::take(children);
        *block = Block::Admonition(Admonition { kind, blocks });
    });
}
