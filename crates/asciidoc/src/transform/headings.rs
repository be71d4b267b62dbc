use super::{NATIVE_ID_PREFIX, NATIVE_ID_SEPARATOR, TransformContext};
use mdadoc_core::{
    AttributeEntry, Block, ConversionOptions, Document, Heading, HeadingIdRegistry, Inline,
    generate_id, native_id, plain_text,
};

pub(super) fn apply_offset(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let offset = i16::from(ctx.options.heading_offset);
    if offset == 0 {
        return;
    }
    document.walk_blocks_mut(&mut |block| {
        if let Block::Heading(heading) = block {
            let shifted = i16::from(heading.level) + offset;
            let clamped = shifted.clamp(1, 6);
            if clamped != shifted {
                log::debug!(
                    "Heading level {} clamped to {} after offset {}",
                    heading.level,
                    clamped,
                    offset
                );
            }
            heading.level = u8::try_from(clamped).unwrap_or(1);
        }
    });
}

pub(super) fn insert_title(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let Some(title) = ctx.front_matter.and_then(|front| front.title.as_deref()) else {
        return;
    };
    if document.title().is_some() {
        log::debug!("Front matter title ignored: the document already starts with a title");
        return;
    }
    document.blocks.insert(
        0,
        Block::Heading(Heading {
            level: 1,
            id: None,
            inlines: vec![Inline::Text(title.to_string())],
        }),
    );
}

/// Outcome of assigning one heading's id.
enum Assigned {
    Kept,
    LazyDropped,
}

fn assign_id(
    heading: &mut Heading,
    options: &ConversionOptions,
    ids: &mut HeadingIdRegistry,
) -> Assigned {
    let text = plain_text(&heading.inlines);
    let prefix = &options.auto_id_prefix;
    let separator = &options.auto_id_separator;
    let base = generate_id(&text, prefix, separator);

    let Some(explicit) = heading.id.take() else {
        if options.auto_ids {
            heading.id = Some(ids.register(&base));
        }
        return Assigned::Kept;
    };

    // A lazy id is dropped only when the output reproduces it exactly: through
    // the auto id, or through the id AsciiDoc generates itself.
    let reproduced = options.lazy_ids
        && if options.auto_ids {
            ids.peek(&base) == explicit
        } else {
            native_id(&text, prefix, separator) == explicit && ids.peek(&explicit) == explicit
        };
    if !reproduced {
        heading.id = Some(ids.register(&explicit));
        return Assigned::Kept;
    }
    if options.auto_ids {
        heading.id = Some(ids.register(&base));
    } else {
        ids.register(&explicit);
    }
    Assigned::LazyDropped
}

pub(super) fn assign_ids(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let options = ctx.options;
    let ids = &mut ctx.ids;
    let mut native_fallback = false;

    document.walk_blocks_mut(&mut |block| {
        if let Block::Heading(heading) = block
            && let Assigned::LazyDropped = assign_id(heading, options, ids)
            && !options.auto_ids
        {
            native_fallback = true;
        }
    });

    if native_fallback
        && (options.auto_id_prefix != NATIVE_ID_PREFIX
            || options.auto_id_separator != NATIVE_ID_SEPARATOR)
    {
        ctx.set_attribute(AttributeEntry::new("idprefix", &options.auto_id_prefix));
        ctx.set_attribute(AttributeEntry::new(
            "idseparator",
            &options.auto_id_separator,
        ));
        ctx.native_id_style = (
            options.auto_id_prefix.clone(),
            options.auto_id_separator.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::doc;
    use mdadoc_core::FrontMatter;

    fn headings(document: &Document) -> Vec<(u8, Option<String>)> {
        let mut out = Vec::new();
        document.walk_blocks(&mut |block| {
            if let Block::Heading(heading) = block {
                out.push((heading.level, heading.id.clone()));
            }
        });
        out
    }

    fn run(input: &str, options: &ConversionOptions) -> (Document, Vec<AttributeEntry>) {
        let mut document = doc(input);
        let mut ctx = TransformContext::new(options, None);
        apply_offset(&mut document, &mut ctx);
        insert_title(&mut document, &mut ctx);
        assign_ids(&mut document, &mut ctx);
        (document, ctx.generated)
    }

    #[test]
    fn offset_clamps_levels() {
        let options = ConversionOptions {
            heading_offset: -2,
            ..Default::default()
        };
        let (document, _) = run("# A\n\n### B\n\n###### C", &options);
        assert_eq!(headings(&document), vec![(1, None), (1, None), (4, None)]);

        let options = ConversionOptions {
            heading_offset: 3,
            ..Default::default()
        };
        let (document, _) = run("# A\n\n#### B", &options);
        assert_eq!(headings(&document), vec![(4, None), (6, None)]);
    }

    #[test]
    fn front_matter_title_is_inserted() {
        let options = ConversionOptions::default();
        let front = FrontMatter {
            title: Some("Guide".to_string()),
            attributes: Vec::new(),
        };
        let mut document = doc("## Part");
        let mut ctx = TransformContext::new(&options, Some(&front));
        insert_title(&mut document, &mut ctx);
        assert_eq!(headings(&document), vec![(1, None), (2, None)]);

        let mut document = doc("# Existing");
        insert_title(&mut document, &mut ctx);
        assert_eq!(document.blocks.len(), 1);
    }

    #[test]
    fn auto_ids_deduplicate_in_order() {
        let options = ConversionOptions {
            auto_ids: true,
            ..Default::default()
        };
        let (document, _) = run("## Heading\n\n## Heading\n\n## Heading", &options);
        assert_eq!(
            headings(&document),
            vec![
                (2, Some("_heading".to_string())),
                (2, Some("_heading-2".to_string())),
                (2, Some("_heading-3".to_string())),
            ]
        );
    }

    #[test]
    fn explicit_ids_are_registered() {
        let options = ConversionOptions {
            auto_ids: true,
            ..Default::default()
        };
        let (document, _) = run("## Setup {#_intro}\n\n## Intro", &options);
        assert_eq!(
            headings(&document),
            vec![
                (2, Some("_intro".to_string())),
                (2, Some("_intro-2".to_string())),
            ]
        );
    }

    #[test]
    fn lazy_ids_match_auto_ids() {
        let lazy = ConversionOptions {
            auto_ids: true,
            lazy_ids: true,
            ..Default::default()
        };
        let (with_explicit, _) = run("## Intro {#_intro}\n\n## Other {#custom}", &lazy);
        let (without, _) = run("## Intro\n\n## Other {#custom}", &lazy);
        assert_eq!(with_explicit, without);
    }

    #[test]
    fn lazy_drop_without_auto_ids_sets_native_style() {
        let options = ConversionOptions {
            lazy_ids: true,
            ..Default::default()
        };
        let (document, generated) = run("## Intro {#_intro}", &options);
        assert_eq!(headings(&document), vec![(2, None)]);
        assert_eq!(
            generated,
            vec![
                AttributeEntry::new("idprefix", "_"),
                AttributeEntry::new("idseparator", "-"),
            ]
        );
    }

    #[test]
    fn lazy_drop_without_auto_ids_requires_native_match() {
        let options = ConversionOptions {
            lazy_ids: true,
            ..Default::default()
        };
        let (document, generated) = run("## What's new? {#_what-s-new}", &options);
        assert_eq!(headings(&document), vec![(2, Some("_what-s-new".to_string()))]);
        assert!(generated.is_empty());

        let (document, generated) = run("## What's new? {#_whats-new}", &options);
        assert_eq!(headings(&document), vec![(2, None)]);
        assert_eq!(generated.len(), 2);
    }

    #[test]
    fn lazy_drop_without_auto_ids_keeps_claimed_ids() {
        let options = ConversionOptions {
            lazy_ids: true,
            ..Default::default()
        };
        let (document, _) = run("## Setup {#_intro}\n\n## Intro {#_intro}", &options);
        assert_eq!(
            headings(&document),
            vec![
                (2, Some("_intro".to_string())),
                (2, Some("_intro-2".to_string())),
            ]
        );
    }
}
