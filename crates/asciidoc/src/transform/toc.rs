use super::TransformContext;
use mdadoc_core::{AttributeEntry, Block, Document};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Begin { depth_to: Option<u8> },
    End,
}

/// Recognizes `<!-- TOC depthFrom:N depthTo:M -->`, `<!-- toc -->`,
/// `<!-- /TOC -->` and `<!-- tocstop -->`.
fn parse_marker(html: &str) -> Option<Marker> {
    let inner = html
        .trim()
        .strip_prefix("<!--")?
        .strip_suffix("-->")?
        .trim();
    let mut tokens = inner.split_whitespace();
    let keyword = tokens.next()?;

    if keyword.eq_ignore_ascii_case("/toc") || keyword.eq_ignore_ascii_case("tocstop") {
        return tokens.next().is_none().then_some(Marker::End);
    }
    if !keyword.eq_ignore_ascii_case("toc") {
        return None;
    }

    let mut depth_to = None;
    for token in tokens {
        let (key, value) = token.split_once(':')?;
        if key.eq_ignore_ascii_case("depthTo") {
            depth_to = value.parse::<u8>().ok();
        }
    }
    Some(Marker::Begin { depth_to })
}

fn marker_at(blocks: &[Block], index: usize) -> Option<Marker> {
    match blocks.get(index) {
        Some(Block::RawHtml(html)) => parse_marker(html),
        _ => None,
    }
}

/// Splices every matched marker pair, with the content between, into a
/// single `TocMacro` block. `found` keeps the `depthTo` of the first pair.
fn splice_pairs(blocks: &mut Vec<Block>, found: &mut Option<Option<u8>>) {
    let mut index = 0;
    while index < blocks.len() {
        match marker_at(blocks, index) {
            Some(Marker::Begin { depth_to }) => {
                let end = (index + 1..blocks.len())
                    .find(|&candidate| marker_at(blocks, candidate) == Some(Marker::End));
                match end {
                    Some(end) => {
                        blocks.splice(index..=end, [Block::TocMacro]);
                        found.get_or_insert(depth_to);
                    }
                    None => log::debug!("TOC begin marker without end marker left as content"),
                }
            }
            Some(Marker::End) => log::debug!("TOC end marker without begin marker left as content"),
            None => {}
        }
        index += 1;
    }
}

pub(super) fn replace_markers(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let mut found = None;
    document.walk_block_lists_mut(&mut |blocks| splice_pairs(blocks, &mut found));

    let Some(depth_to) = found else {
        return;
    };
    ctx.set_attribute(AttributeEntry::new("toc", "macro"));
    if let Some(depth_to) = depth_to {
        let levels = (i32::from(depth_to) + i32::from(ctx.options.heading_offset) - 1).clamp(1, 5);
        ctx.set_attribute(AttributeEntry::new("toclevels", levels.to_string()));
    }
}
