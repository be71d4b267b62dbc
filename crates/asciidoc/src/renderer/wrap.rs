//! Line layout of paragraph text.

use super::escape::escape_line_start;
use mdadoc_core::WrapMode;
use unicode_width::UnicodeWidthStr;

const HARD_BREAK: &str = " +";

fn source_lines(segment: &str) -> impl Iterator<Item = &str> {
    segment.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// A line as written: a trailing ` +` neutralized, then a structural start
/// escaped.
fn finish_line(line: &str, escape: bool) -> String {
    let line = if line.ends_with(HARD_BREAK) || line == "+" {
        format!("{}{{plus}}", &line[..line.len() - 1])
    } else {
        line.to_string()
    };
    if escape {
        escape_line_start(&line).into_owned()
    } else {
        line
    }
}

/// Position of a segment's lines within the paragraph.
#[derive(Clone, Copy)]
struct Frame {
    /// Width of the marker written before the paragraph's first line.
    lead: usize,
    /// Paragraph line index of the segment's first line.
    first: usize,
}

impl Frame {
    fn is_first(self, idx: usize) -> bool {
        self.first + idx == 0
    }

    fn escapes(self, idx: usize) -> bool {
        self.lead == 0 || !self.is_first(idx)
    }

    fn room(self, width: usize, idx: usize) -> usize {
        if self.is_first(idx) {
            width.saturating_sub(self.lead)
        } else {
            width
        }
    }

    fn finish<S: AsRef<str>>(self, lines: impl IntoIterator<Item = S>) -> Vec<String> {
        lines
            .into_iter()
            .enumerate()
            .map(|(idx, line)| finish_line(line.as_ref(), self.escapes(idx)))
            .collect()
    }
}

/// Greedy fill by display width, measuring each line as it will be written.
///
/// With `hard_break` the last line also keeps room for the break marker. A
/// lone word may exceed its room.
fn fill(segment: &str, width: usize, frame: Frame, hard_break: bool) -> Vec<String> {
    let fits = |idx: usize, line: &str, reserve: usize| {
        finish_line(line, frame.escapes(idx)).width() + reserve <= frame.room(width, idx)
    };

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in segment.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if fits(lines.len(), &candidate, 0) {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        if hard_break
            && !fits(lines.len(), &current, HARD_BREAK.len())
            && let Some((head, word)) = current.rsplit_once(' ')
        {
            let word = word.to_string();
            lines.push(head.to_string());
            current = word;
        }
        lines.push(current);
    }
    frame.finish(lines)
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')', '*', '_'])
        .ends_with(['.', '?', '!'])
}

fn ventilate(segment: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in segment.split_whitespace() {
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        if ends_sentence(word) {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn wrap_segment(segment: &str, mode: WrapMode, frame: Frame, hard_break: bool) -> Vec<String> {
    match mode {
        WrapMode::Preserve => frame.finish(source_lines(segment)),
        WrapMode::None => {
            let joined = source_lines(segment).collect::<Vec<_>>().join(" ");
            if joined.is_empty() {
                Vec::new()
            } else {
                frame.finish([joined])
            }
        }
        WrapMode::Width(width) => fill(segment, width, frame, hard_break),
        WrapMode::Ventilate => frame.finish(ventilate(segment)),
    }
}

/// Lays out hard-break separated segments as finished output lines.
///
/// Every segment but the last ends with an AsciiDoc hard line break. `lead`
/// is the width of a marker written before the first line, such as a list
/// item's `* [x] `; that line is then not escaped. In [`WrapMode::Width`] no
/// line is wider than the width, counting marker, escapes and break, unless
/// it holds a single word.
pub(super) fn layout(segments: &[String], mode: WrapMode, lead: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (idx, segment) in segments.iter().enumerate() {
        let last_segment = idx + 1 == segments.len();
        let frame = Frame {
            lead,
            first: out.len(),
        };
        let mut lines = wrap_segment(segment, mode, frame, !last_segment);
        if !last_segment {
            match lines.last_mut() {
                Some(line) => line.push_str(HARD_BREAK),
                None => lines.push(format!("{{empty}}{HARD_BREAK}")),
            }
        }
        out.extend(lines);
    }
    out
}
