//! Block rendering.

use super::context::{Context, Scope};
use super::escape::escape_verbatim_line;
use super::inline::{InlineWriter, image_macro};
use super::wrap::layout;
use mdadoc_core::{
    Admonition, Alignment, Block, Cell, CodeBlock, Heading, Inline, List, ListKind, Table,
};

/// Shortest run of `ch`, at least `min` long, that no content line equals.
fn delimiter<'l>(ch: char, min: usize, lines: impl Iterator<Item = &'l str> + Clone) -> String {
    let mut delimiter = ch.to_string().repeat(min);
    while lines.clone().any(|line| line.trim_end() == delimiter) {
        delimiter.push(ch);
    }
    delimiter
}

fn separator(previous: &Block, next: &Block) -> &'static str {
    match (previous, next) {
        (Block::AttributeEntry(_), Block::AttributeEntry(_)) => "\n",
        (Block::Heading(heading), Block::AttributeEntry(_)) if heading.level == 1 => "\n",
        (Block::List(_), Block::List(_)) => "\n\n//-\n\n",
        _ => "\n\n",
    }
}

fn table_row(cells: &[String], columns: usize) -> String {
    (0..columns)
        .map(|idx| match cells.get(idx).map(String::as_str) {
            Some("") | None => "|".to_string(),
            Some(cell) => format!("| {cell}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Context<'_> {
    /// Renders blocks separated by blank lines.
    pub fn blocks(&mut self, blocks: &[Block]) -> String {
        let mut out = String::new();
        let mut previous: Option<&Block> = None;
        for block in blocks {
            let rendered = self.block(block);
            if rendered.is_empty() {
                continue;
            }
            if let Some(previous) = previous {
                out.push_str(separator(previous, block));
            }
            out.push_str(&rendered);
            previous = Some(block);
        }
        out
    }

    fn block(&mut self, block: &Block) -> String {
        match block {
            Block::Heading(heading) => self.heading(heading),
            Block::Paragraph(inlines) => self.paragraph(inlines),
            Block::List(list) => self.list(list),
            Block::CodeBlock(code) => code_block(code),
            Block::BlockQuote(blocks) => self.quote(blocks),
            Block::Admonition(admonition) => self.admonition(admonition),
            Block::Table(table) => self.table(table),
            Block::ThematicBreak => "'''".to_string(),
            Block::RawHtml(html) => {
                let fence = delimiter('+', 4, html.lines());
                format!("{fence}\n{html}\n{fence}")
            }
            Block::Comment(text) => comment(text),
            Block::TocMacro => "toc::[]".to_string(),
            Block::AttributeEntry(entry) => entry.to_string(),
        }
    }

    fn heading(&mut self, heading: &Heading) -> String {
        let mut writer = InlineWriter::flat(self.strategy);
        writer.write_all(&heading.inlines);
        let mut text = writer.finish_flat();
        if text.is_empty() {
            text.push_str("{empty}");
        }

        let mut out = String::new();
        match (self.is_nested(), heading.id.as_deref()) {
            (true, Some(id)) => out.push_str(&format!("[discrete#{id}]\n")),
            (true, None) => out.push_str("[discrete]\n"),
            (false, Some(id)) => out.push_str(&format!("[#{id}]\n")),
            (false, None) => {}
        }
        out.push_str(&"=".repeat(usize::from(heading.level.clamp(1, 6))));
        out.push(' ');
        out.push_str(&text);
        out
    }

    /// Laid out paragraph lines; `lead` is the width of a marker before the first.
    fn paragraph_lines(&self, inlines: &[Inline], lead: usize) -> Vec<String> {
        let mut writer = InlineWriter::new(self.strategy);
        writer.write_all(inlines);
        layout(&writer.finish(), self.strategy.wrap, lead)
    }

    fn paragraph(&mut self, inlines: &[Inline]) -> String {
        if let [Inline::Image { url, alt, title }] = inlines {
            return image_macro("image::", url, alt, title.as_deref(), None);
        }
        self.paragraph_lines(inlines, 0).join("\n")
    }

    fn list(&mut self, list: &List) -> String {
        self.enter(Scope::List(list.kind));
        let depth = self.list_depth(list.kind).min(5);
        let marker = match list.kind {
            ListKind::Unordered => "*".repeat(depth),
            ListKind::Ordered { .. } => ".".repeat(depth),
        };

        let mut lines: Vec<String> = Vec::new();
        if let ListKind::Ordered { start } = list.kind
            && start != 1
        {
            lines.push(format!("[start={start}]"));
        }

        for item in &list.items {
            let check = match item.checked {
                Some(true) => "[x] ",
                Some(false) => "[ ] ",
                None => "",
            };
            let lead = format!("{marker} {check}");
            let mut rest = item.blocks.as_slice();
            let mut first = Vec::new();
            if let Some((Block::Paragraph(inlines), tail)) = item.blocks.split_first() {
                first = self.paragraph_lines(inlines, lead.len());
                rest = tail;
            }
            let mut first = first.into_iter();
            let head = first.next().unwrap_or_else(|| "{empty}".to_string());
            lines.push(format!("{lead}{head}"));
            lines.extend(first);

            let mut after_list = false;
            for block in rest {
                let rendered = self.block(block);
                if rendered.is_empty() {
                    continue;
                }
                if let Block::List(_) = block {
                    after_list = true;
                } else {
                    if after_list {
                        lines.push(String::new());
                    }
                    lines.push("+".to_string());
                    after_list = false;
                }
                lines.push(rendered);
            }
        }

        self.exit();
        lines.join("\n")
    }

    fn quote(&mut self, blocks: &[Block]) -> String {
        let fence = "_".repeat(4 + self.depth_of(Scope::Quote));
        self.enter(Scope::Quote);
        let inner = self.blocks(blocks);
        self.exit();
        if inner.is_empty() {
            format!("{fence}\n{fence}")
        } else {
            format!("{fence}\n{inner}\n{fence}")
        }
    }

    fn admonition(&mut self, admonition: &Admonition) -> String {
        let fence = "=".repeat(4 + self.depth_of(Scope::Admonition));
        self.enter(Scope::Admonition);
        let inner = self.blocks(&admonition.blocks);
        self.exit();
        let label = admonition.kind.label();
        if inner.is_empty() {
            format!("[{label}]\n{fence}\n{fence}")
        } else {
            format!("[{label}]\n{fence}\n{inner}\n{fence}")
        }
    }

    fn cell(&self, cell: &Cell) -> String {
        let mut writer = InlineWriter::flat(self.strategy);
        writer.write_all(cell);
        writer.finish_flat().replace('|', "\\|")
    }

    fn table(&mut self, table: &Table) -> String {
        let columns = table.header.len().max(table.alignments.len()).max(1);
        let mut lines = Vec::new();

        if table.alignments.iter().any(|align| *align != Alignment::None) {
            let cols: Vec<&str> = (0..columns)
                .map(|idx| match table.alignments.get(idx).copied().unwrap_or_default() {
                    Alignment::Left => "<",
                    Alignment::Center => "^",
                    Alignment::Right => ">",
                    Alignment::None => "1",
                })
                .collect();
            lines.push(format!("[cols=\"{}\"]", cols.join(",")));
        }

        lines.push("|===".to_string());
        let header: Vec<String> = table.header.iter().map(|cell| self.cell(cell)).collect();
        lines.push(table_row(&header, columns));
        lines.push(String::new());
        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|cell| self.cell(cell)).collect();
            lines.push(table_row(&cells, columns));
        }
        lines.push("|===".to_string());
        lines.join("\n")
    }
}

fn code_block(code: &CodeBlock) -> String {
    let lines = code.lines.iter().map(String::as_str);
    let (style, fence) = match code.language.as_deref() {
        Some(language) if code.diagram => (Some(format!("[{language}]")), delimiter('.', 4, lines)),
        Some(language) => (Some(format!("[source,{language}]")), delimiter('-', 4, lines)),
        None => (None, delimiter('-', 4, lines)),
    };

    let mut out = Vec::with_capacity(code.lines.len() + 3);
    out.extend(style);
    out.push(fence.clone());
    out.extend(
        code.lines
            .iter()
            .map(|line| escape_verbatim_line(line).into_owned()),
    );
    out.push(fence);
    out.join("\n")
}

fn comment(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        "//".to_string()
    } else if text.contains('\n') {
        let fence = delimiter('/', 4, text.lines());
        format!("{fence}\n{text}\n{fence}")
    } else {
        format!("// {text}")
    }
}
