//! Escaping of Markdown text that AsciiDoc would otherwise interpret.

use super::strategy::UrlStyle;
use std::borrow::Cow;

/// Marks that form both constrained (`*x*`) and unconstrained (`**x**`) pairs.
const PAIRED_MARKS: [char; 5] = ['*', '_', '`', '#', '+'];
/// Marks that form unconstrained spans without spaces (`^sup^`, `~sub~`).
const SPAN_MARKS: [char; 2] = ['^', '~'];

const INLINE_MACROS: &[&str] = &[
    "anchor",
    "asciimath",
    "btn",
    "footnote",
    "footnoteref",
    "icon",
    "image",
    "indexterm",
    "indexterm2",
    "kbd",
    "latexmath",
    "link",
    "mailto",
    "menu",
    "pass",
    "stem",
    "xref",
];

const URL_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "irc://", "file://"];

const REPLACEMENTS: &[&str] = &["(C)", "(R)", "(TM)", "->", "<-", "=>", "<="];

const PREPROCESSOR: &[&str] = &["include::", "ifdef::", "ifndef::", "ifeval::", "endif::"];

const ADMONITION_LABELS: &[&str] = &["NOTE: ", "TIP: ", "IMPORTANT: ", "WARNING: ", "CAUTION: "];

pub(super) fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Whether `url` is recognized by AsciiDoc without the `link:` prefix.
pub(super) fn is_scheme_url(url: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) || url.starts_with("mailto:")
}

/// Percent-encodes characters that end an AsciiDoc macro target.
pub(super) fn encode_url(url: &str) -> Cow<'_, str> {
    if url.contains([' ', '[', ']']) {
        Cow::Owned(
            url.replace(' ', "%20")
                .replace('[', "%5B")
                .replace(']', "%5D"),
        )
    } else {
        Cow::Borrowed(url)
    }
}

/// Escapes text placed inside macro brackets.
pub(super) fn escape_brackets(text: &str) -> String {
    text.replace(']', "\\]")
}

/// Wraps an attribute value in double quotes.
pub(super) fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

fn constrained_close(chars: &[char], open: usize, mark: char) -> Option<usize> {
    let before = open.checked_sub(1).map(|idx| chars[idx]);
    if before.is_some_and(|ch| is_word(ch) || matches!(ch, ';' | ':' | '}' | '\\')) {
        return None;
    }
    let after = *chars.get(open + 1)?;
    if after.is_whitespace() || after == mark {
        return None;
    }
    (open + 2..chars.len()).find(|&close| {
        chars[close] == mark
            && !chars[close - 1].is_whitespace()
            && chars.get(close + 1).is_none_or(|&next| !is_word(next))
    })
}

fn unconstrained_close(chars: &[char], open: usize, mark: char) -> Option<usize> {
    if chars.get(open + 1) != Some(&mark) {
        return None;
    }
    (open + 3..chars.len().saturating_sub(1))
        .find(|&close| chars[close] == mark && chars[close + 1] == mark)
}

fn span_close(chars: &[char], open: usize, mark: char) -> Option<usize> {
    for (idx, &ch) in chars.iter().enumerate().skip(open + 1) {
        if ch.is_whitespace() {
            return None;
        }
        if ch == mark {
            return (idx > open + 1).then_some(idx);
        }
    }
    None
}

fn attribute_reference(chars: &[char], open: usize) -> bool {
    let mut idx = open + 1;
    match chars.get(idx) {
        Some(&ch) if ch.is_ascii_alphanumeric() || ch == '_' => {}
        _ => return false,
    }
    while let Some(&ch) = chars.get(idx) {
        match ch {
            '}' | ':' => return true,
            ch if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' => idx += 1,
            _ => return false,
        }
    }
    false
}

fn starts_with_at(chars: &[char], at: usize, needle: &str) -> bool {
    let mut idx = at;
    for expected in needle.chars() {
        if chars.get(idx) != Some(&expected) {
            return false;
        }
        idx += 1;
    }
    true
}

fn contains_from(chars: &[char], from: usize, needle: &str) -> bool {
    (from..chars.len()).any(|idx| starts_with_at(chars, idx, needle))
}

fn inline_macro(chars: &[char], at: usize) -> bool {
    let name_end = (at..chars.len())
        .find(|&idx| !chars[idx].is_ascii_lowercase() && !chars[idx].is_ascii_digit())
        .unwrap_or(chars.len());
    if name_end == at || chars.get(name_end) != Some(&':') {
        return false;
    }
    let name: String = chars[at..name_end].iter().collect();
    if !INLINE_MACROS.contains(&name.as_str()) {
        return false;
    }
    chars[name_end + 1..]
        .iter()
        .take_while(|ch| !ch.is_whitespace())
        .any(|&ch| ch == '[')
}

fn email_at(chars: &[char], at: usize) -> bool {
    let local = |ch: char| ch.is_alphanumeric() || matches!(ch, '.' | '%' | '+' | '-' | '_');
    let mut idx = at;
    while chars.get(idx).is_some_and(|&ch| local(ch)) {
        idx += 1;
    }
    if idx == at || chars.get(idx) != Some(&'@') {
        return false;
    }
    let domain_start = idx + 1;
    let mut end = domain_start;
    while chars
        .get(end)
        .is_some_and(|&ch| ch.is_alphanumeric() || matches!(ch, '.' | '-'))
    {
        end += 1;
    }
    let domain: String = chars[domain_start..end].iter().collect();
    let domain = domain.trim_end_matches('.');
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
}

/// Escapes inline text so AsciiDoc renders it literally.
///
/// Formatting marks are escaped only where AsciiDoc would find a matching
/// pair; lone marks are left alone.
pub(super) fn escape_text(text: &str, urls: UrlStyle) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    // Index up to which a mark's pair has already been consumed.
    let mut consumed: [usize; PAIRED_MARKS.len() + SPAN_MARKS.len()] = [0; 7];
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        let at_boundary = idx == 0 || !is_word(chars[idx - 1]);

        if let Some(slot) = PAIRED_MARKS.iter().position(|&mark| mark == ch)
            && idx >= consumed[slot]
        {
            if let Some(close) = unconstrained_close(&chars, idx, ch) {
                out.push_str("pass:[");
                out.push(ch);
                out.push(ch);
                out.push(']');
                consumed[slot] = close + 2;
                idx += 2;
                continue;
            }
            if let Some(close) = constrained_close(&chars, idx, ch) {
                out.push('\\');
                consumed[slot] = close + 1;
            }
        } else if let Some(slot) = SPAN_MARKS.iter().position(|&mark| mark == ch)
            && idx >= consumed[PAIRED_MARKS.len() + slot]
            && let Some(close) = span_close(&chars, idx, ch)
        {
            out.push('\\');
            consumed[PAIRED_MARKS.len() + slot] = close + 1;
        } else if ch == '{' && attribute_reference(&chars, idx) {
            out.push('\\');
        } else if (ch == '<' && starts_with_at(&chars, idx, "<<") && contains_from(&chars, idx + 2, ">>"))
            || (ch == '[' && starts_with_at(&chars, idx, "[[") && contains_from(&chars, idx + 2, "]]"))
        {
            out.push('\\');
        } else if REPLACEMENTS
            .iter()
            .any(|pattern| starts_with_at(&chars, idx, pattern))
            || (ch == '-'
                && idx > 0
                && is_word(chars[idx - 1])
                && starts_with_at(&chars, idx, "--")
                && chars.get(idx + 2).is_some_and(|&next| is_word(next)))
        {
            out.push('\\');
        } else if at_boundary && inline_macro(&chars, idx) {
            out.push('\\');
        } else if urls == UrlStyle::Escaped
            && at_boundary
            && (URL_SCHEMES.iter().any(|scheme| starts_with_at(&chars, idx, scheme))
                || ((idx == 0 || !matches!(chars[idx - 1], '.' | '%' | '+' | '-' | '@'))
                    && email_at(&chars, idx)))
        {
            out.push('\\');
        }

        out.push(ch);
        idx += 1;
    }
    out
}

fn is_delimiter_line(line: &str) -> bool {
    let Some(first) = line.chars().next() else {
        return false;
    };
    let run = line.chars().take_while(|&ch| ch == first).count();
    let whole = run == line.chars().count();
    match first {
        '=' | '-' | '.' | '*' | '_' | '+' | '/' => whole && run >= 4,
        '\'' => whole && run >= 3,
        _ => false,
    }
}

fn starts_with_marker_run(line: &str, marker: char) -> bool {
    let rest = line.trim_start_matches(marker);
    rest.len() < line.len() && (rest.is_empty() || rest.starts_with(' '))
}

fn is_ordered_marker(line: &str) -> bool {
    let Some((head, _)) = line.split_once(' ') else {
        return false;
    };
    if let Some(number) = head.strip_suffix('.') {
        return (!number.is_empty() && number.chars().all(|ch| ch.is_ascii_digit()))
            || (number.chars().count() == 1 && number.chars().all(|ch| ch.is_ascii_alphabetic()));
    }
    if let Some(roman) = head.strip_suffix(')') {
        return !roman.is_empty() && roman.chars().all(|ch| "ivxlcdmIVXLCDM0123456789".contains(ch));
    }
    if let Some(callout) = head.strip_prefix('<').and_then(|h| h.strip_suffix('>')) {
        return callout == "." || (!callout.is_empty() && callout.chars().all(|ch| ch.is_ascii_digit()));
    }
    false
}

fn is_attribute_entry(line: &str) -> bool {
    let Some(rest) = line.strip_prefix(':') else {
        return false;
    };
    let rest = rest.strip_prefix('!').unwrap_or(rest);
    let Some((name, after)) = rest.split_once(':') else {
        return false;
    };
    let name = name.strip_suffix('!').unwrap_or(name);
    let valid = name
        .chars()
        .next()
        .is_some_and(|ch| ch.is_alphanumeric() || ch == '_')
        && name.chars().all(|ch| is_word(ch) || ch == '-');
    valid && (after.is_empty() || after.starts_with(char::is_whitespace))
}

fn is_block_macro(line: &str) -> bool {
    let Some((name, rest)) = line.split_once("::") else {
        return false;
    };
    !name.is_empty()
        && name.chars().all(|ch| is_word(ch) || ch == '-')
        && rest.contains('[')
        && rest.ends_with(']')
}

fn needs_empty_prefix(line: &str) -> bool {
    ['=', '#', '*', '-'].iter().any(|&marker| starts_with_marker_run(line, marker))
        || line.starts_with('.')
        || line.starts_with("//")
        || line == "+"
        || line == "--"
        || line.starts_with("```")
        || line.starts_with("<<<")
        || is_delimiter_line(line)
        || ["|===", ",===", ":===", "!==="]
            .iter()
            .any(|prefix| line.starts_with(prefix))
        || line == ">"
        || line.starts_with("> ")
        || (line.starts_with('[') && line.ends_with(']'))
        || is_attribute_entry(line)
        || is_ordered_marker(line)
        || ADMONITION_LABELS.iter().any(|label| line.starts_with(label))
        || is_block_macro(line)
}

/// Breaks a `term:: definition` or `term;; definition` line.
fn description_term(line: &str) -> Option<String> {
    for (delimiter, replacement) in [("::", "{two-colons}"), (";;", "{two-semicolons}")] {
        let mut search = 0;
        while let Some(found) = line[search..].find(delimiter) {
            let at = search + found;
            let after = &line[at + delimiter.len()..];
            let after = after.trim_start_matches(':');
            let before_ok = line[..at].chars().last().is_some_and(|ch| !ch.is_whitespace());
            if before_ok && (after.is_empty() || after.starts_with(char::is_whitespace)) {
                return Some(format!(
                    "{}{}{}",
                    &line[..at],
                    replacement,
                    &line[at + delimiter.len()..]
                ));
            }
            search = at + delimiter.len();
        }
    }
    None
}

/// Escapes a line whose start AsciiDoc would read as block structure.
pub(super) fn escape_line_start(line: &str) -> Cow<'_, str> {
    if PREPROCESSOR.iter().any(|directive| line.starts_with(directive)) {
        return Cow::Owned(format!("\\{line}"));
    }
    let line: Cow<'_, str> = match description_term(line) {
        Some(fixed) => Cow::Owned(fixed),
        None => Cow::Borrowed(line),
    };
    if needs_empty_prefix(&line) {
        return Cow::Owned(format!("{{empty}}{line}"));
    }
    line
}

/// Escapes a preprocessor directive inside verbatim content.
pub(super) fn escape_verbatim_line(line: &str) -> Cow<'_, str> {
    if PREPROCESSOR.iter().any(|directive| line.starts_with(directive)) {
        Cow::Owned(format!("\\{line}"))
    } else {
        Cow::Borrowed(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn esc(text: &str) -> String {
        escape_text(text, UrlStyle::Bare)
    }

    #[test]
    fn lone_marks_are_untouched() {
        assert_eq!(esc("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(esc("snake_case_name"), "snake_case_name");
        assert_eq!(esc("issue #42"), "issue #42");
        assert_eq!(esc("~/.config"), "~/.config");
    }

    #[test]
    fn constrained_pairs_are_escaped() {
        assert_eq!(esc("a *literal* star"), "a \\*literal* star");
        assert_eq!(esc("_init_ file"), "\\_init_ file");
        assert_eq!(esc("E=mc^2^"), "E=mc\\^2^");
    }

    #[test]
    fn unconstrained_pairs_use_passthrough() {
        assert_eq!(esc("__init__"), "pass:[__]init__");
        assert_eq!(esc("C++ and C++"), "Cpass:[++] and C++");
    }

    #[test]
    fn attribute_references_and_replacements() {
        assert_eq!(esc("use {version} here"), "use \\{version} here");
        assert_eq!(esc("a {} b"), "a {} b");
        assert_eq!(esc("a -> b"), "a \\-> b");
        assert_eq!(esc("word--word"), "word\\--word");
        assert_eq!(esc("see <<x>>"), "see \\<<x>>");
    }

    #[test]
    fn inline_macros_are_escaped() {
        assert_eq!(esc("type link:x[y] here"), "type \\link:x[y] here");
        assert_eq!(esc("image: none"), "image: none");
    }

    #[test]
    fn urls_follow_style() {
        assert_eq!(esc("go to https://example.com"), "go to https://example.com");
        assert_eq!(
            escape_text("go to https://example.com", UrlStyle::Escaped),
            "go to \\https://example.com"
        );
        assert_eq!(
            escape_text("mail me@example.com", UrlStyle::Escaped),
            "mail \\me@example.com"
        );
    }

    #[test]
    fn line_starts() {
        assert_eq!(escape_line_start("= not a title"), "{empty}= not a title");
        assert_eq!(escape_line_start("* not a list"), "{empty}* not a list");
        assert_eq!(escape_line_start(".Not a title"), "{empty}.Not a title");
        assert_eq!(escape_line_start("1. one"), "{empty}1. one");
        assert_eq!(escape_line_start("NOTE: hi"), "{empty}NOTE: hi");
        assert_eq!(escape_line_start(":name: value"), "{empty}:name: value");
        assert_eq!(escape_line_start("[role]"), "{empty}[role]");
        assert_eq!(escape_line_start("----"), "{empty}----");
        assert_eq!(escape_line_start("include::x.adoc[]"), "\\include::x.adoc[]");
        assert_eq!(escape_line_start("Term:: def"), "Term{two-colons} def");
        assert_eq!(escape_line_start("std::vec::Vec"), "std::vec::Vec");
        assert_eq!(escape_line_start("plain text"), "plain text");
        assert_eq!(escape_line_start("*bold* start"), "*bold* start");
    }

    #[test]
    fn urls_are_encoded() {
        assert_eq!(encode_url("a b.png"), "a%20b.png");
        assert_eq!(encode_url("https://x.io/"), "https://x.io/");
    }
}
