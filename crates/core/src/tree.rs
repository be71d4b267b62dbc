//! Document tree shared by the parser adapter, the transformer and the renderer.

use crate::AttributeEntry;

/// Root of a parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
}

/// Block-level node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Section heading.
    Heading(Heading),
    /// Paragraph of inline content.
    Paragraph(Vec<Inline>),
    /// Ordered or unordered list.
    List(List),
    /// Fenced or indented code.
    CodeBlock(CodeBlock),
    /// Quoted blocks.
    BlockQuote(Vec<Block>),
    /// Admonition such as NOTE or WARNING.
    Admonition(Admonition),
    /// Table with a header row.
    Table(Table),
    /// Horizontal rule.
    ThematicBreak,
    /// Raw HTML block, passed through verbatim.
    RawHtml(String),
    /// Comment text, without the comment delimiters.
    Comment(String),
    /// Placeholder for a generated table of contents.
    TocMacro,
    /// Document attribute entry.
    AttributeEntry(AttributeEntry),
}

/// Section heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// Level, 1 being the document title.
    pub level: u8,
    /// Explicit or assigned id.
    pub id: Option<String>,
    /// Heading text.
    pub inlines: Vec<Inline>,
}

/// List flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Bulleted list.
    Unordered,
    /// Numbered list starting at `start`.
    Ordered {
        /// First item number.
        start: u32,
    },
}

/// List block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    /// List flavor.
    pub kind: ListKind,
    /// Items in order.
    pub items: Vec<ListItem>,
}

/// Single list item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Task list checkbox state, if the item is a task.
    pub checked: Option<bool>,
    /// Item content.
    pub blocks: Vec<Block>,
}

/// Code block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language token from the fence info string.
    pub language: Option<String>,
    /// Remainder of the info string.
    pub meta: Option<String>,
    /// Raw content lines.
    pub lines: Vec<String>,
    /// Render as a diagram block.
    pub diagram: bool,
}

/// Admonition label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmonitionKind {
    /// NOTE
    Note,
    /// TIP
    Tip,
    /// IMPORTANT
    Important,
    /// WARNING
    Warning,
    /// CAUTION
    Caution,
}

impl AdmonitionKind {
    /// Parse a GitHub alert label such as `NOTE` (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "NOTE" => Some(Self::Note),
            "TIP" => Some(Self::Tip),
            "IMPORTANT" => Some(Self::Important),
            "WARNING" => Some(Self::Warning),
            "CAUTION" => Some(Self::Caution),
            _ => None,
        }
    }

    /// Upper-case label as written in AsciiDoc.
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Tip => "TIP",
            Self::Important => "IMPORTANT",
            Self::Warning => "WARNING",
            Self::Caution => "CAUTION",
        }
    }
}

/// Admonition block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admonition {
    /// Label.
    pub kind: AdmonitionKind,
    /// Content.
    pub blocks: Vec<Block>,
}

/// Column alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Unspecified.
    #[default]
    None,
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Table cell content.
pub type Cell = Vec<Inline>;

/// Table block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// One alignment per column.
    pub alignments: Vec<Alignment>,
    /// Header row.
    pub header: Vec<Cell>,
    /// Body rows.
    pub rows: Vec<Vec<Cell>>,
}

/// Inline node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    /// Literal text; soft line breaks are kept as `'\n'`.
    Text(String),
    /// Emphasis.
    Emphasis(Vec<Inline>),
    /// Strong emphasis.
    Strong(Vec<Inline>),
    /// Strikethrough.
    Strikethrough(Vec<Inline>),
    /// Hyperlink.
    Link {
        /// Target.
        url: String,
        /// Optional title.
        title: Option<String>,
        /// Link text.
        children: Vec<Inline>,
    },
    /// Inline image.
    Image {
        /// Path or URL.
        url: String,
        /// Alternative text.
        alt: String,
        /// Optional title.
        title: Option<String>,
    },
    /// Code span.
    Code(String),
    /// Inline raw HTML.
    Html(String),
    /// Hard line break.
    LineBreak,
    /// Footnote with its content.
    Footnote(Vec<Inline>),
}

/// Concatenated text of `inlines`, ignoring markup.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. } => push_plain_text(children, out),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::LineBreak => out.push(' '),
            Inline::Html(_) | Inline::Footnote(_) => {}
        }
    }
}

impl Document {
    /// The document title: a level-1 heading in first position.
    pub fn title(&self) -> Option<&Heading> {
        match self.blocks.first() {
            Some(Block::Heading(heading)) if heading.level == 1 => Some(heading),
            _ => None,
        }
    }

    /// Visits every block in pre-order.
    pub fn walk_blocks(&self, f: &mut impl FnMut(&Block)) {
        walk_blocks(&self.blocks, f);
    }

    /// Visits every block in pre-order, mutably.
    pub fn walk_blocks_mut(&mut self, f: &mut impl FnMut(&mut Block)) {
        walk_blocks_mut(&mut self.blocks, f);
    }

    /// Visits every block list (the root and each container's children) in pre-order.
    pub fn walk_block_lists_mut(&mut self, f: &mut impl FnMut(&mut Vec<Block>)) {
        walk_block_lists_mut(&mut self.blocks, f);
    }

    /// Visits every inline list in pre-order; a list is visited before its children.
    pub fn walk_inline_lists_mut(&mut self, f: &mut impl FnMut(&mut Vec<Inline>)) {
        self.walk_blocks_mut(&mut |block| match block {
            Block::Heading(heading) => walk_inline_lists_mut(&mut heading.inlines, f),
            Block::Paragraph(inlines) => walk_inline_lists_mut(inlines, f),
            Block::Table(table) => {
                for cell in table.header.iter_mut().chain(table.rows.iter_mut().flatten()) {
                    walk_inline_lists_mut(cell, f);
                }
            }
            _ => {}
        });
    }
}

fn block_children(block: &Block) -> Vec<&Vec<Block>> {
    match block {
        Block::BlockQuote(blocks) => vec![blocks],
        Block::Admonition(admonition) => vec![&admonition.blocks],
        Block::List(list) => list.items.iter().map(|item| &item.blocks).collect(),
        _ => Vec::new(),
    }
}

fn block_children_mut(block: &mut Block) -> Vec<&mut Vec<Block>> {
    match block {
        Block::BlockQuote(blocks) => vec![blocks],
        Block::Admonition(admonition) => vec![&mut admonition.blocks],
        Block::List(list) => list.items.iter_mut().map(|item| &mut item.blocks).collect(),
        _ => Vec::new(),
    }
}

fn walk_blocks(blocks: &[Block], f: &mut impl FnMut(&Block)) {
    for block in blocks {
        f(block);
        for children in block_children(block) {
            walk_blocks(children, f);
        }
    }
}

fn walk_blocks_mut(blocks: &mut [Block], f: &mut impl FnMut(&mut Block)) {
    for block in blocks {
        f(block);
        for children in block_children_mut(block) {
            walk_blocks_mut(children, f);
        }
    }
}

fn walk_block_lists_mut(blocks: &mut Vec<Block>, f: &mut impl FnMut(&mut Vec<Block>)) {
    f(blocks);
    for block in blocks.iter_mut() {
        for children in block_children_mut(block) {
            walk_block_lists_mut(children, f);
        }
    }
}

/// Visits `inlines` and every nested inline list in pre-order.
pub fn walk_inline_lists_mut(inlines: &mut Vec<Inline>, f: &mut impl FnMut(&mut Vec<Inline>)) {
    f(inlines);
    for inline in inlines.iter_mut() {
        match inline {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Footnote(children)
            | Inline::Link { children, .. } => walk_inline_lists_mut(children, f),
            _ => {}
        }
    }
}
