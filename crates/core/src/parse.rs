//! markdown-rs adapter: parses Markdown and lowers the MDAST into a [`Document`].

use crate::slug::extract_custom_id;
use crate::tree::{
    Alignment, Block, CodeBlock, Document, Heading, Inline, List, ListItem, ListKind, Table,
};
use crate::{ConversionOptions, ConvertError, SourceFormat};
use markdown::mdast::{self, AlignKind, Node};
use markdown::message::{Message, Place};
use std::collections::HashMap;

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Turn bare URLs and emails into links (GFM only).
    pub autolink_literal: bool,
}

impl ParseOptions {
    /// Options for the given source dialect.
    pub const fn for_format(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Markdown => Self {
                gfm: true,
                autolink_literal: true,
            },
            SourceFormat::CommonMark => Self {
                gfm: false,
                autolink_literal: false,
            },
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    ///
    /// Front matter is handled by the normalizer and stays disabled; raw HTML
    /// is always parsed so the HTML policy can decide what to keep.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: false,
            html_flow: true,
            html_text: true,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = self.autolink_literal;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        markdown::ParseOptions {
            constructs,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::for_format(SourceFormat::Markdown)
    }
}

impl From<&ConversionOptions> for ParseOptions {
    fn from(options: &ConversionOptions) -> Self {
        let base = Self::for_format(options.format);
        Self {
            autolink_literal: base.autolink_literal && options.auto_links,
            ..base
        }
    }
}

/// Parse markdown into an MDAST tree.
pub fn parse_mdast(input: &str, options: ParseOptions) -> Result<Node, ConvertError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        let (line, column) = message_location(&err);
        ConvertError::parse_error(err.reason.clone(), line, column)
    })
}

/// Parse normalized markdown into a [`Document`].
pub fn parse(input: &str, options: ParseOptions) -> Result<Document, ConvertError> {
    let root = parse_mdast(input, options)?;
    let mut lowerer = Lowerer::default();
    lowerer.collect(&root);
    let blocks = match &root {
        Node::Root(root) => lowerer.blocks(&root.children),
        other => lowerer.blocks(std::slice::from_ref(other)),
    };
    Ok(Document { blocks })
}

fn message_location(message: &Message) -> (usize, usize) {
    match message.place.as_deref() {
        Some(Place::Point(point)) => (point.line, point.column),
        Some(Place::Position(position)) => (position.start.line, position.start.column),
        None => (1, 1),
    }
}

#[derive(Default)]
struct Lowerer<'a> {
    definitions: HashMap<&'a str, &'a mdast::Definition>,
    footnotes: HashMap<&'a str, &'a [Node]>,
    active_footnotes: Vec<&'a str>,
}

impl<'a> Lowerer<'a> {
    fn collect(&mut self, node: &'a Node) {
        match node {
            Node::Definition(definition) => {
                self.definitions
                    .entry(definition.identifier.as_str())
                    .or_insert(definition);
            }
            Node::FootnoteDefinition(footnote) => {
                self.footnotes
                    .entry(footnote.identifier.as_str())
                    .or_insert(&footnote.children);
            }
            _ => {}
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect(child);
            }
        }
    }

    fn blocks(&mut self, nodes: &'a [Node]) -> Vec<Block> {
        nodes.iter().filter_map(|node| self.block(node)).collect()
    }

    fn block(&mut self, node: &'a Node) -> Option<Block> {
        let block = match node {
            Node::Heading(heading) => {
                let mut inlines = self.inlines(&heading.children);
                let id = take_custom_id(&mut inlines);
                Block::Heading(Heading {
                    level: heading.depth.clamp(1, 6),
                    id,
                    inlines,
                })
            }
            Node::Paragraph(paragraph) => Block::Paragraph(self.inlines(&paragraph.children)),
            Node::List(list) => Block::List(List {
                kind: if list.ordered {
                    ListKind::Ordered {
                        start: list.start.unwrap_or(1),
                    }
                } else {
                    ListKind::Unordered
                },
                items: list
                    .children
                    .iter()
                    .map(|child| match child {
                        Node::ListItem(item) => ListItem {
                            checked: item.checked,
                            blocks: self.blocks(&item.children),
                        },
                        other => ListItem {
                            checked: None,
                            blocks: self.block(other).into_iter().collect(),
                        },
                    })
                    .collect(),
            }),
            Node::Code(code) => Block::CodeBlock(CodeBlock {
                language: code.lang.clone(),
                meta: code.meta.clone(),
                lines: code.value.lines().map(String::from).collect(),
                diagram: false,
            }),
            Node::Blockquote(quote) => Block::BlockQuote(self.blocks(&quote.children)),
            Node::Table(table) => Block::Table(self.table(table)),
            Node::ThematicBreak(_) => Block::ThematicBreak,
            Node::Html(html) => Block::RawHtml(html.value.clone()),
            Node::Definition(_) | Node::FootnoteDefinition(_) => return None,
            Node::ListItem(item) => Block::List(List {
                kind: ListKind::Unordered,
                items: vec![ListItem {
                    checked: item.checked,
                    blocks: self.blocks(&item.children),
                }],
            }),
            other => {
                log::warn!("Unhandled markdown node type: {:?}", other);
                return None;
            }
        };
        Some(block)
    }

    fn table(&mut self, table: &'a mdast::Table) -> Table {
        let mut rows = table.children.iter().filter_map(|row| match row {
            Node::TableRow(row) => Some(row),
            _ => None,
        });
        let header = rows
            .next()
            .map(|row| self.row(&row.children))
            .unwrap_or_default();
        let rows: Vec<&mdast::TableRow> = rows.collect();
        Table {
            alignments: table
                .align
                .iter()
                .map(|align| match align {
                    AlignKind::Left => Alignment::Left,
                    AlignKind::Center => Alignment::Center,
                    AlignKind::Right => Alignment::Right,
                    AlignKind::None => Alignment::None,
                })
                .collect(),
            header,
            rows: rows.into_iter().map(|row| self.row(&row.children)).collect(),
        }
    }

    fn row(&mut self, cells: &'a [Node]) -> Vec<Vec<Inline>> {
        cells
            .iter()
            .map(|cell| match cell {
                Node::TableCell(cell) => self.inlines(&cell.children),
                other => self.inlines(std::slice::from_ref(other)),
            })
            .collect()
    }

    fn inlines(&mut self, nodes: &'a [Node]) -> Vec<Inline> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.inline(node, &mut out);
        }
        merge_text(out)
    }

    fn inline(&mut self, node: &'a Node, out: &mut Vec<Inline>) {
        let inline = match node {
            Node::Text(text) => Inline::Text(text.value.clone()),
            Node::Emphasis(node) => Inline::Emphasis(self.inlines(&node.children)),
            Node::Strong(node) => Inline::Strong(self.inlines(&node.children)),
            Node::Delete(node) => Inline::Strikethrough(self.inlines(&node.children)),
            Node::InlineCode(code) => Inline::Code(code.value.clone()),
            Node::Html(html) => Inline::Html(html.value.clone()),
            Node::Break(_) => Inline::LineBreak,
            Node::Link(link) => Inline::Link {
                url: link.url.clone(),
                title: link.title.clone(),
                children: self.inlines(&link.children),
            },
            Node::Image(image) => Inline::Image {
                url: image.url.clone(),
                alt: image.alt.clone(),
                title: image.title.clone(),
            },
            Node::LinkReference(reference) => {
                let children = self.inlines(&reference.children);
                match self.definitions.get(reference.identifier.as_str()) {
                    Some(definition) => Inline::Link {
                        url: definition.url.clone(),
                        title: definition.title.clone(),
                        children,
                    },
                    None => {
                        out.push(Inline::Text("[".to_string()));
                        out.extend(children);
                        Inline::Text("]".to_string())
                    }
                }
            }
            Node::ImageReference(reference) => {
                match self.definitions.get(reference.identifier.as_str()) {
                    Some(definition) => Inline::Image {
                        url: definition.url.clone(),
                        alt: reference.alt.clone(),
                        title: definition.title.clone(),
                    },
                    None => Inline::Text(reference.alt.clone()),
                }
            }
            Node::FootnoteReference(reference) => self.footnote(reference),
            other => {
                log::warn!("Unhandled markdown node type: {:?}", other);
                return;
            }
        };
        out.push(inline);
    }

    fn footnote(&mut self, reference: &'a mdast::FootnoteReference) -> Inline {
        let identifier = reference.identifier.as_str();
        let label = reference.label.as_deref().unwrap_or(identifier);
        let Some(children) = self.footnotes.get(identifier).copied() else {
            return Inline::Text(format!("[^{label}]"));
        };
        if self.active_footnotes.contains(&identifier) {
            log::debug!("Footnote `{label}` references itself; leaving it as text");
            return Inline::Text(format!("[^{label}]"));
        }

        self.active_footnotes.push(identifier);
        let content = self.footnote_content(children);
        self.active_footnotes.pop();
        Inline::Footnote(merge_text(content))
    }

    fn footnote_content(&mut self, nodes: &'a [Node]) -> Vec<Inline> {
        let mut content = Vec::new();
        for node in nodes {
            let part = match node {
                Node::Paragraph(paragraph) => self.inlines(&paragraph.children),
                Node::Code(code) => vec![Inline::Code(code.value.replace('\n', " "))],
                other => match other.children() {
                    Some(children) => self.footnote_content(children),
                    None => continue,
                },
            };
            if part.is_empty() {
                continue;
            }
            if !content.is_empty() {
                content.push(Inline::Text(" ".to_string()));
            }
            content.extend(part);
        }
        content
    }
}

fn merge_text(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut merged: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines {
        if let Inline::Text(text) = &inline {
            if text.is_empty() {
                continue;
            }
            if let Some(Inline::Text(previous)) = merged.last_mut() {
                previous.push_str(text);
                continue;
            }
        }
        merged.push(inline);
    }
    merged
}

/// Removes a trailing `{#id}` from heading text and returns the id.
fn take_custom_id(inlines: &mut Vec<Inline>) -> Option<String> {
    let id = match inlines.last_mut()? {
        Inline::Text(text) => {
            let (stripped, id) = extract_custom_id(text);
            let id = id?.to_string();
            *text = stripped.to_string();
            id
        }
        Inline::Emphasis(children) | Inline::Strong(children) => {
            return take_custom_id(children);
        }
        _ => return None,
    };
    if matches!(inlines.last(), Some(Inline::Text(text)) if text.is_empty()) {
        inlines.pop();
    }
    if let Some(Inline::Text(text)) = inlines.last_mut() {
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
    }
    Some(id)
}
