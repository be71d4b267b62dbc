//! Inline node rendering.

use super::escape::{encode_url, escape_brackets, escape_text, is_scheme_url, is_word, quote};
use super::strategy::{RenderStrategy, UrlStyle};
use mdadoc_core::{Inline, plain_text};

const CODE_SPECIALS: &[char] = &[
    '*', '_', '#', '^', '~', '{', '}', '[', ']', '\\', '\'', '"', ':', '<', '>',
];
const CODE_SEQUENCES: &[&str] = &["--", "...", "(C)", "(R)", "(TM)", "->", "<-", "=>", "<="];

/// Characters after which a bare URL is still recognized.
fn url_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '<' | '>' | '(' | ')' | '[' | ']' | ';' | '"' | '\'')
}

/// First character the rendered form of `inline` starts with.
fn leading_char(inline: &Inline) -> Option<char> {
    match inline {
        Inline::Text(text) => text.chars().next(),
        Inline::Emphasis(_) => Some('_'),
        Inline::Strong(_) => Some('*'),
        Inline::Strikethrough(_) => Some('['),
        Inline::Code(_) => Some('`'),
        Inline::Html(_) => Some('+'),
        Inline::LineBreak => Some(' '),
        Inline::Link { url, .. } if url.starts_with('#') => Some('<'),
        Inline::Link { .. } | Inline::Image { .. } | Inline::Footnote(_) => Some('x'),
    }
}

/// Writes inline nodes as AsciiDoc text.
///
/// Output is split into segments at hard line breaks; flat writers turn
/// every break into a space instead.
pub(super) struct InlineWriter<'a> {
    strategy: &'a RenderStrategy,
    segments: Vec<String>,
    current: String,
    flat: bool,
    in_brackets: bool,
}

impl<'a> InlineWriter<'a> {
    pub fn new(strategy: &'a RenderStrategy) -> Self {
        Self {
            strategy,
            segments: Vec::new(),
            current: String::new(),
            flat: false,
            in_brackets: false,
        }
    }

    /// A writer producing a single line.
    pub fn flat(strategy: &'a RenderStrategy) -> Self {
        Self {
            flat: true,
            ..Self::new(strategy)
        }
    }

    fn bracketed(strategy: &'a RenderStrategy) -> Self {
        Self {
            in_brackets: true,
            ..Self::flat(strategy)
        }
    }

    pub fn write_all(&mut self, inlines: &[Inline]) {
        for (idx, inline) in inlines.iter().enumerate() {
            self.write(inline, inlines.get(idx + 1));
        }
    }

    /// Returns the hard-break separated segments.
    pub fn finish(mut self) -> Vec<String> {
        self.segments.push(self.current);
        self.segments
    }

    /// Returns the single line written by a flat writer.
    pub fn finish_flat(self) -> String {
        self.current.trim().to_string()
    }

    fn last_char(&self) -> Option<char> {
        self.current.chars().last()
    }

    fn render_flat(&self, inlines: &[Inline]) -> String {
        let mut writer = InlineWriter::flat(self.strategy);
        writer.write_all(inlines);
        writer.finish_flat()
    }

    fn render_bracketed(&self, inlines: &[Inline]) -> String {
        let mut writer = InlineWriter::bracketed(self.strategy);
        writer.write_all(inlines);
        writer.finish_flat()
    }

    /// Whether a formatting pair around `children` must be unconstrained.
    fn needs_unconstrained(&self, children: &[Inline], next: Option<&Inline>) -> bool {
        let inner = plain_text(children);
        self.last_char()
            .is_some_and(|ch| is_word(ch) || matches!(ch, ';' | ':' | '}'))
            || next.and_then(leading_char).is_some_and(is_word)
            || inner.starts_with(char::is_whitespace)
            || inner.ends_with(char::is_whitespace)
    }

    fn write(&mut self, inline: &Inline, next: Option<&Inline>) {
        match inline {
            Inline::Text(text) => self.text(text),
            Inline::Emphasis(children) => self.formatted("_", "_", children, next),
            Inline::Strong(children) => self.formatted("*", "*", children, next),
            Inline::Strikethrough(children) => {
                let role = if self.in_brackets {
                    "[.line-through\\]#"
                } else {
                    "[.line-through]#"
                };
                self.formatted(role, "#", children, next);
            }
            Inline::Code(code) => self.code(code, next),
            Inline::Link {
                url,
                title,
                children,
            } => self.link(url, title.as_deref(), children),
            Inline::Image { url, alt, title } => {
                let image = image_macro("image:", url, alt, title.as_deref(), None);
                self.current.push_str(&image);
            }
            Inline::Html(html) => {
                let html = self.flatten(html);
                self.current.push_str("+++");
                self.current.push_str(&html);
                self.current.push_str("+++");
            }
            Inline::LineBreak => {
                if self.flat {
                    self.current.push(' ');
                } else {
                    self.segments.push(std::mem::take(&mut self.current));
                }
            }
            Inline::Footnote(children) => {
                let text = self.render_bracketed(children);
                self.current.push_str("footnote:[");
                self.current.push_str(&text);
                self.current.push(']');
            }
        }
    }

    fn flatten(&self, text: &str) -> String {
        if self.flat {
            text.replace('\n', " ")
        } else {
            text.to_string()
        }
    }

    fn text(&mut self, text: &str) {
        let text = if self.in_brackets {
            escape_brackets(text)
        } else {
            text.to_string()
        };
        let escaped = self.flatten(&escape_text(&text, self.strategy.urls));
        self.current.push_str(&escaped);
    }

    fn formatted(&mut self, open: &str, close: &str, children: &[Inline], next: Option<&Inline>) {
        if children.is_empty() {
            return;
        }
        let double = self.needs_unconstrained(children, next);
        let mark = |text: &str| {
            if double {
                let (prefix, last) = text.split_at(text.len() - 1);
                format!("{prefix}{last}{last}")
            } else {
                text.to_string()
            }
        };
        self.current.push_str(&mark(open));
        self.write_all(children);
        self.current.push_str(&mark(close));
    }

    fn code(&mut self, code: &str, next: Option<&Inline>) {
        if code.is_empty() {
            return;
        }
        let unconstrained = self.last_char().is_some_and(is_word)
            || next.and_then(leading_char).is_some_and(is_word);
        let tick = if unconstrained { "``" } else { "`" };
        let edges_blank = code.starts_with(' ') || code.ends_with(' ');

        let body = if code.contains(['+', '`']) || edges_blank {
            format!("pass:c[{}]", escape_brackets(code))
        } else if code.contains(CODE_SPECIALS)
            || CODE_SEQUENCES.iter().any(|seq| code.contains(seq))
        {
            format!("+{code}+")
        } else {
            code.to_string()
        };
        self.current.push_str(tick);
        self.current.push_str(&body);
        self.current.push_str(tick);
    }

    fn link(&mut self, url: &str, title: Option<&str>, children: &[Inline]) {
        if let Some(fragment) = url.strip_prefix('#') {
            let text = self.render_flat(children);
            if text.is_empty() {
                self.current.push_str(&format!("<<{fragment}>>"));
            } else {
                self.current.push_str(&format!("<<{fragment},{text}>>"));
            }
            return;
        }

        if let [Inline::Image {
            url: src,
            alt,
            title: image_title,
        }] = children
        {
            let image = image_macro("image:", src, alt, image_title.as_deref(), Some(url));
            self.current.push_str(&image);
            return;
        }

        let target = encode_url(url);
        let plain = plain_text(children);
        let literal = plain == url || url.strip_prefix("mailto:") == Some(plain.as_str());
        if literal && title.is_none() && is_scheme_url(url) {
            let bare_ok = self.strategy.urls == UrlStyle::Bare
                && self.last_char().is_none_or(url_boundary);
            if bare_ok {
                self.current.push_str(&plain);
            } else {
                self.current.push_str(&format!("{target}[]"));
            }
            return;
        }

        let text = self.render_bracketed(children);
        let text = if title.is_some() || text.contains('=') {
            quote(&text)
        } else {
            text
        };
        let attrs = match title {
            Some(title) => format!("{text},title={}", quote(title)),
            None => text,
        };
        if is_scheme_url(url) {
            self.current.push_str(&format!("{target}[{attrs}]"));
        } else {
            self.current.push_str(&format!("link:{target}[{attrs}]"));
        }
    }
}

/// Renders an image macro; `prefix` is `image:` or `image::`.
pub(super) fn image_macro(
    prefix: &str,
    src: &str,
    alt: &str,
    title: Option<&str>,
    link: Option<&str>,
) -> String {
    let mut attrs = Vec::new();
    if !alt.is_empty() {
        if alt.contains([',', '=', '"']) || title.is_some() || link.is_some() {
            attrs.push(quote(&escape_brackets(alt)));
        } else {
            attrs.push(escape_brackets(alt));
        }
    }
    if let Some(title) = title {
        attrs.push(format!("title={}", quote(title)));
    }
    if let Some(link) = link {
        attrs.push(format!("link={}", quote(&encode_url(link))));
    }
    format!("{prefix}{}[{}]", encode_url(src), attrs.join(","))
}
