use super::TransformContext;
use mdadoc_core::{AttributeEntry, Document, Inline};

pub(super) fn rewrite_paths(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let Some(dir) = ctx.options.imagesdir.as_deref() else {
        return;
    };
    let dir = dir.trim_end_matches('/');
    let dir = dir.strip_prefix("./").unwrap_or(dir);
    if dir.is_empty() {
        return;
    }
    let prefix = format!("{dir}/");

    let mut rewritten = false;
    document.walk_inline_lists_mut(&mut |inlines| {
        for inline in inlines.iter_mut() {
            let Inline::Image { url, .. } = inline else {
                continue;
            };
            let path = url.strip_prefix("./").unwrap_or(url.as_str());
            if let Some(rest) = path.strip_prefix(&prefix)
                && !rest.is_empty()
            {
                *url = rest.to_string();
                rewritten = true;
            }
        }
    });

    if rewritten {
        ctx.set_attribute(AttributeEntry::new("imagesdir", dir));
    }
}
