use super::TransformContext;
use mdadoc_core::{Block, Document, Inline, plain_text};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Native {
    Strong,
    Emphasis,
    Code,
    Strikethrough,
}

#[derive(Debug, PartialEq, Eq)]
enum Tag<'a> {
    Open(&'a str),
    Close(&'a str),
    Break,
}

fn native_for(name: &str) -> Option<Native> {
    match name {
        "b" | "strong" => Some(Native::Strong),
        "i" | "em" => Some(Native::Emphasis),
        "code" | "tt" => Some(Native::Code),
        "del" | "s" | "strike" => Some(Native::Strikethrough),
        _ => None,
    }
}

/// Parses a bare tag such as `<b>`, `</em>` or `<br/>`. Tags carrying
/// attributes are not recognized.
fn parse_tag(raw: &str) -> Option<Tag<'_>> {
    let inner = raw.trim().strip_prefix('<')?.strip_suffix('>')?;
    let (closing, name) = match inner.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, inner.trim_end().trim_end_matches('/').trim_end()),
    };
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let name_lower = name.to_ascii_lowercase();
    if name_lower == "br" {
        return (!closing).then_some(Tag::Break);
    }
    native_for(&name_lower)?;
    Some(if closing {
        Tag::Close(name)
    } else {
        Tag::Open(name)
    })
}

fn find_close(inlines: &[Inline], open_index: usize, name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, inline) in inlines.iter().enumerate().skip(open_index + 1) {
        let Inline::Html(raw) = inline else {
            continue;
        };
        match parse_tag(raw) {
            Some(Tag::Open(other)) if other.eq_ignore_ascii_case(name) => depth += 1,
            Some(Tag::Close(other)) if other.eq_ignore_ascii_case(name) => {
                if depth == 0 {
                    return Some(index);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn fold_inlines(inlines: &mut Vec<Inline>) {
    let mut index = 0;
    while index < inlines.len() {
        let Inline::Html(raw) = &inlines[index] else {
            index += 1;
            continue;
        };
        match parse_tag(raw) {
            Some(Tag::Break) => inlines[index] = Inline::LineBreak,
            Some(Tag::Open(name)) => {
                let name = name.to_ascii_lowercase();
                if let (Some(native), Some(close)) =
                    (native_for(&name), find_close(inlines, index, &name))
                {
                    let children: Vec<Inline> = inlines.drain(index + 1..close).collect();
                    inlines.remove(index + 1);
                    inlines[index] = match native {
                        Native::Strong => Inline::Strong(children),
                        Native::Emphasis => Inline::Emphasis(children),
                        Native::Strikethrough => Inline::Strikethrough(children),
                        Native::Code => Inline::Code(plain_text(&children)),
                    };
                }
            }
            Some(Tag::Close(_)) | None => {}
        }
        index += 1;
    }
}

/// Returns the comment text when `raw` is exactly one HTML comment.
fn single_comment(raw: &str) -> Option<&str> {
    let inner = raw.trim().strip_prefix("<!--")?.strip_suffix("-->")?;
    (!inner.contains("-->")).then(|| inner.trim())
}

pub(super) fn fold_html(document: &mut Document, ctx: &mut TransformContext<'_>) {
    if !ctx.options.html_to_native {
        return;
    }

    document.walk_blocks_mut(&mut |block| {
        if let Block::RawHtml(raw) = block
            && let Some(comment) = single_comment(raw)
        {
            *block = Block::Comment(comment.to_string());
        }
    });
    document.walk_inline_lists_mut(&mut fold_inlines);
}
