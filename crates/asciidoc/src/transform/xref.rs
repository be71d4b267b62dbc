use super::TransformContext;
use mdadoc_core::{Block, Document, Inline, Slugger, native_id, plain_text};
use std::collections::HashMap;

/// Maps every anchor a Markdown author could have written for a heading to
/// the id the heading ends up with.
fn anchor_table(document: &Document, native_style: &(String, String)) -> HashMap<String, String> {
    let mut anchors = HashMap::new();
    let mut slugger = Slugger::new();
    document.walk_blocks(&mut |block| {
        let Block::Heading(heading) = block else {
            return;
        };
        let text = plain_text(&heading.inlines);
        let slug = slugger.next_slug(&text);
        let target = heading
            .id
            .clone()
            .unwrap_or_else(|| native_id(&text, &native_style.0, &native_style.1));
        if target.is_empty() {
            return;
        }
        anchors
            .entry(target.clone())
            .or_insert_with(|| target.clone());
        anchors.entry(slug).or_insert(target);
    });
    anchors
}

pub(super) fn resolve_fragments(document: &mut Document, ctx: &mut TransformContext<'_>) {
    let anchors = anchor_table(document, &ctx.native_id_style);
    if anchors.is_empty() {
        return;
    }
    document.walk_inline_lists_mut(&mut |inlines| {
        for inline in inlines.iter_mut() {
            if let Inline::Link { url, .. } = inline
                && let Some(fragment) = url.strip_prefix('#')
                && let Some(target) = anchors.get(fragment)
            {
                *url = format!("#{target}");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::transformed;
    use mdadoc_core::ConversionOptions;

    fn link_urls(document: &Document) -> Vec<String> {
        let mut document = document.clone();
        let mut urls = Vec::new();
        document.walk_inline_lists_mut(&mut |inlines| {
            for inline in inlines.iter() {
                if let Inline::Link { url, .. } = inline {
                    urls.push(url.clone());
                }
            }
        });
        urls
    }

    #[test]
    fn github_anchor_resolves_to_auto_id() {
        let options = ConversionOptions {
            auto_ids: true,
            ..Default::default()
        };
        let document = transformed(
            "See [setup](#getting-started).\n\n## Getting Started",
            &options,
        );
        assert_eq!(link_urls(&document), vec!["#_getting-started"]);
    }

    #[test]
    fn heading_without_id_resolves_to_native_id() {
        let document = transformed(
            "See [setup](#getting-started).\n\n## Getting Started",
            &ConversionOptions::default(),
        );
        assert_eq!(link_urls(&document), vec!["#_getting_started"]);
    }

    #[test]
    fn punctuated_title_resolves_to_native_id() {
        let document = transformed(
            "See [x](#whats-new) and [y](#qa-tips--tricks).\n\n## What's new?\n\n## Q&A: Tips & Tricks",
            &ConversionOptions::default(),
        );
        assert_eq!(link_urls(&document), vec!["#_whats_new", "#_qa_tips_tricks"]);
    }

    #[test]
    fn explicit_ids_and_unknown_fragments() {
        let document = transformed(
            "[a](#install) [b](#nowhere) [c](https://example.com#frag)\n\n## Install {#install}",
            &ConversionOptions::default(),
        );
        assert_eq!(
            link_urls(&document),
            vec!["#install", "#nowhere", "https://example.com#frag"]
        );
    }

    #[test]
    fn duplicate_github_slugs_follow_document_order() {
        let options = ConversionOptions {
            auto_ids: true,
            ..Default::default()
        };
        let document = transformed(
            "[second](#usage-1)\n\n## Usage\n\n## Usage",
            &options,
        );
        assert_eq!(link_urls(&document), vec!["#_usage-2"]);
    }
}
