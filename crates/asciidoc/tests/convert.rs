use mdadoc_asciidoc::convert;
use mdadoc_core::{AttributeEntry, ConversionOptions, WrapMode};

fn adoc(markdown: &str) -> String {
    convert(markdown, &ConversionOptions::default()).expect("conversion should succeed")
}

#[test]
fn heading_and_body() {
    assert_eq!(adoc("# Heading\n\nBody content."), "= Heading\n\nBody content.");
}

#[test]
fn front_matter_title() {
    assert_eq!(
        adoc("---\ntitle: Document Title\n---\nBody content.\n"),
        "= Document Title\n\nBody content."
    );
}

#[test]
fn single_list_item() {
    assert_eq!(adoc("- list item\n"), "* list item");
}

#[test]
fn negative_heading_offset() {
    let options = ConversionOptions {
        heading_offset: -1,
        auto_ids: false,
        ..Default::default()
    };
    assert_eq!(convert("### Heading 3", &options).unwrap(), "== Heading 3");
}

#[test]
fn duplicate_auto_ids() {
    let options = ConversionOptions {
        auto_ids: true,
        auto_id_prefix: "_".into(),
        auto_id_separator: "-".into(),
        ..Default::default()
    };
    insta::assert_snapshot!(convert("## Heading\n\n## Heading", &options).unwrap(), @r"
    [#_heading]
    == Heading

    [#_heading-2]
    == Heading
    ");
}

#[test]
fn heading_levels_stay_in_range() {
    let source = "# One\n\n## Two\n\n### Three\n\n###### Six";
    for offset in -8..=8 {
        let options = ConversionOptions {
            heading_offset: offset,
            ..Default::default()
        };
        let output = convert(source, &options).unwrap();
        for line in output.lines().filter(|line| line.starts_with('=')) {
            let level = line.chars().take_while(|&ch| ch == '=').count();
            assert!((1..=6).contains(&level), "offset {offset}: {line}");
        }
    }
}

#[test]
fn ids_increase_in_document_order() {
    let options = ConversionOptions {
        auto_ids: true,
        ..Default::default()
    };
    let output = convert("## A\n\n## A\n\n### A\n\n## A", &options).unwrap();
    let ids: Vec<&str> = output
        .lines()
        .filter_map(|line| line.strip_prefix("[#")?.strip_suffix(']'))
        .collect();
    assert_eq!(ids, vec!["_a", "_a-2", "_a-3", "_a-4"]);
}

#[test]
fn lazy_ids_match_generated_output() {
    let options = ConversionOptions {
        auto_ids: true,
        lazy_ids: true,
        ..Default::default()
    };
    let explicit = convert("## Getting Started {#_getting-started}\n\nText", &options).unwrap();
    let implicit = convert("## Getting Started\n\nText", &options).unwrap();
    assert_eq!(explicit, implicit);
    assert_eq!(explicit, "[#_getting-started]\n== Getting Started\n\nText");
}

#[test]
fn lazy_id_without_auto_ids_sets_native_style() {
    let options = ConversionOptions {
        lazy_ids: true,
        ..Default::default()
    };
    insta::assert_snapshot!(convert("## Getting Started {#_getting-started}", &options).unwrap(), @r"
    :idprefix: _
    :idseparator: -

    == Getting Started
    ");
}

#[test]
fn reflow_respects_width() {
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
                tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam.";
    let options = ConversionOptions {
        wrap: WrapMode::Width(30),
        ..Default::default()
    };
    let output = convert(text, &options).unwrap();
    assert!(output.lines().count() > 1);
    for line in output.lines() {
        assert!(line.chars().count() <= 30 || !line.contains(' '), "{line}");
    }
    let words: Vec<&str> = output.split_whitespace().collect();
    assert_eq!(words, text.split_whitespace().collect::<Vec<_>>());
}

#[test]
fn conversion_is_deterministic() {
    let source = "# T\n\n## A\n\n## A\n\n- [x] a\n- b\n\n| x | y |\n|---|---|\n| 1 | 2 |";
    let options = ConversionOptions {
        auto_ids: true,
        ..Default::default()
    };
    let first = convert(source, &options).unwrap();
    for _ in 0..5 {
        assert_eq!(convert(source, &options).unwrap(), first);
    }
}

#[test]
fn full_document() {
    let source = r#"---
title: User Guide
author: Jane Doe
---

<!-- TOC depthTo:3 -->

- [Install](#install)

<!-- /TOC -->

## Install

> [!NOTE]
> Requires **Rust**.

See [usage](#usage) and <b>bold</b> text.

## Usage

```mermaid
graph TD
```
"#;
    insta::assert_snapshot!(adoc(source), @r"
    = User Guide
    :toc: macro
    :toclevels: 2
    :author: Jane Doe

    toc::[]

    == Install

    [NOTE]
    ====
    Requires *Rust*.
    ====

    See <<_usage,usage>> and *bold* text.

    == Usage

    [mermaid]
    ....
    graph TD
    ....
    ");
}

#[test]
fn images_and_attributes() {
    let options = ConversionOptions {
        imagesdir: Some("images/".into()),
        attributes: vec![AttributeEntry::flag("sectnums")],
        ..Default::default()
    };
    insta::assert_snapshot!(convert("# Doc\n\n![Logo](images/logo.png)", &options).unwrap(), @r"
    = Doc
    :imagesdir: images
    :sectnums:

    image::logo.png[Logo]
    ");
}

#[test]
fn auto_links_off_escapes_urls() {
    let options = ConversionOptions {
        auto_links: false,
        ..Default::default()
    };
    assert_eq!(
        convert("Visit https://example.com today.", &options).unwrap(),
        "Visit \\https://example.com today."
    );
    assert_eq!(
        adoc("Visit https://example.com today."),
        "Visit https://example.com today."
    );
}

#[test]
fn invalid_options_are_rejected() {
    let options = ConversionOptions {
        auto_id_prefix: "a b".into(),
        ..Default::default()
    };
    let err = convert("text", &options).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("autoIdPrefix"));
}

fn assert_within(output: &str, width: usize) {
    for line in output.lines() {
        assert!(line.chars().count() <= width || !line.contains(' '), "{line}");
    }
}

#[test]
fn reflow_counts_markers_escapes_and_breaks() {
    let reflow = |source: &str, width: usize| {
        let options = ConversionOptions {
            wrap: WrapMode::Width(width),
            ..Default::default()
        };
        convert(source, &options).unwrap()
    };

    let list = reflow("- aaaa bbbb cccc dddd eeee ffff gggg hhhh", 20);
    assert_eq!(list, "* aaaa bbbb cccc\ndddd eeee ffff gggg\nhhhh");
    assert_within(&list, 20);

    let escaped = reflow("aaaa bbbb cccc. * dddd eeee ffff gggg", 15);
    assert_eq!(escaped, "aaaa bbbb cccc.\n{empty}* dddd\neeee ffff gggg");
    assert_within(&escaped, 15);

    let broken = reflow("aaaa bbbb cccc dddd\\\nnext", 19);
    assert_eq!(broken, "aaaa bbbb cccc\ndddd +\nnext");
    assert_within(&broken, 19);
}

#[test]
fn fragment_links_follow_native_ids_of_punctuated_titles() {
    assert_eq!(
        adoc("See [x](#whats-new).\n\n## What's new?"),
        "See <<_whats_new,x>>.\n\n== What's new?"
    );
}

#[test]
fn lazy_id_is_kept_unless_native_ids_reproduce_it() {
    let options = ConversionOptions {
        lazy_ids: true,
        ..Default::default()
    };
    assert_eq!(
        convert("## What's new? {#_what-s-new}", &options).unwrap(),
        "[#_what-s-new]\n== What's new?"
    );
    insta::assert_snapshot!(convert("## What's new? {#_whats-new}", &options).unwrap(), @r"
    :idprefix: _
    :idseparator: -

    == What's new?
    ");
}
