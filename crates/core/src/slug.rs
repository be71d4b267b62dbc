use std::collections::HashMap;

/// Extracts a `{#custom-id}` suffix from heading text.
///
/// If the text ends with `{#some-id}` (where the id contains ASCII alphanumerics,
/// hyphens, or underscores), returns the trimmed text without the suffix and `Some(id)`.
/// Otherwise returns the original text and `None`.
///
/// # Examples
///
/// ```
/// use mdadoc_core::slug::extract_custom_id;
///
/// let (text, id) = extract_custom_id("Install {#install}");
/// assert_eq!(text, "Install");
/// assert_eq!(id, Some("install"));
/// ```
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some(without_brace) = trimmed.strip_suffix('}') else {
        return (text, None);
    };
    let Some(open) = without_brace.rfind("{#") else {
        return (text, None);
    };

    let id = &without_brace[open + 2..];
    if !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return (without_brace[..open].trim_end(), Some(id));
    }
    (text, None)
}

/// Builds a section id: `prefix` plus the lower-cased text with every run of
/// non-alphanumeric characters replaced by `separator`.
///
/// Text without any alphanumeric character yields `section`.
///
/// ```
/// use mdadoc_core::slug::generate_id;
///
/// assert_eq!(generate_id("Getting Started!", "_", "-"), "_getting-started");
/// assert_eq!(generate_id("???", "_", "-"), "_section");
/// ```
pub fn generate_id(text: &str, prefix: &str, separator: &str) -> String {
    let mut slug = String::new();
    let mut pending_separator = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push_str(separator);
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("section");
    }
    format!("{prefix}{slug}")
}

/// Predicts the id AsciiDoc itself gives a section titled `text` when the
/// document sets `idprefix` and `idseparator` to `prefix` and `separator`.
///
/// Characters other than word characters, spaces, `-` and `.` are deleted;
/// runs of spaces, `-` and `.` (and of the separator) collapse into one
/// separator. Only the first character of `separator` is used.
///
/// ```
/// use mdadoc_core::slug::native_id;
///
/// assert_eq!(native_id("What's new?", "_", "_"), "_whats_new");
/// assert_eq!(native_id("Version 1.2", "_", "-"), "_version-1-2");
/// ```
pub fn native_id(text: &str, prefix: &str, separator: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|&ch| matches!(ch, ' ' | '-' | '.' | '_') || ch.is_alphanumeric())
        .collect();
    let raw = format!("{prefix}{kept}");

    let Some(sep) = separator.chars().next() else {
        return raw.replace(' ', "");
    };
    let collapses = |ch: char| matches!(ch, ' ' | '-' | '.') || ch == sep;

    let mut id = String::with_capacity(raw.len());
    let mut in_run = false;
    for ch in raw.chars() {
        if collapses(ch) {
            if !in_run {
                id.push(sep);
            }
            in_run = true;
        } else {
            id.push(ch);
            in_run = false;
        }
    }
    if id.ends_with(sep) {
        id.pop();
    }
    if prefix.is_empty() && id.starts_with(sep) {
        id.remove(0);
    }
    id
}

/// Per-conversion registry of heading ids.
///
/// The first use of an id keeps it; later uses of the same base receive the
/// first free `-2`, `-3`, ... suffix.
#[derive(Debug, Default)]
pub struct HeadingIdRegistry {
    counts: HashMap<String, usize>,
}

impl HeadingIdRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id `register` would return for `id`, without recording it.
    pub fn peek(&self, id: &str) -> String {
        let Some(uses) = self.counts.get(id) else {
            return id.to_string();
        };
        let mut suffix = uses + 1;
        loop {
            let candidate = format!("{id}-{suffix}");
            if !self.counts.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Records `id` and returns the unique id to use for it.
    pub fn register(&mut self, id: &str) -> String {
        let unique = self.peek(id);
        if unique != id {
            *self.counts.entry(id.to_string()).or_insert(0) += 1;
        }
        *self.counts.entry(unique.clone()).or_insert(0) += 1;
        unique
    }
}

/// Github-slugger compatible slug generator, used to resolve `#fragment`
/// links written against GitHub-rendered anchors.
#[derive(Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next slug for the given heading text.
    pub fn next_slug(&mut self, text: &str) -> String {
        slugify(text, &mut self.counts)
    }
}

// Mn, Mc and Me ranges for the scripts most often seen in headings.
fn is_combining_mark(ch: char) -> bool {
    use std::ops::RangeInclusive;

    const RANGES: &[RangeInclusive<u32>] = &[
        0x0300..=0x036F,
        0x0591..=0x05BD,
        0x05BF..=0x05C7,
        0x0610..=0x061A,
        0x064B..=0x065F,
        0x0670..=0x0670,
        0x0900..=0x0903,
        0x093A..=0x094F,
        0x0951..=0x0957,
        0x0962..=0x0963,
        0x0980..=0x0983,
        0x09BC..=0x09CD,
        0x0A01..=0x0A03,
        0x0A3C..=0x0A4D,
        0x0A81..=0x0A83,
        0x0ABC..=0x0ACD,
        0x0B01..=0x0B03,
        0x0BBE..=0x0BCD,
        0x0E31..=0x0E3A,
        0x0E47..=0x0E4E,
        0x1AB0..=0x1AFF,
        0x1DC0..=0x1DFF,
        0x302A..=0x302F,
        0x3099..=0x309A,
        0xFE20..=0xFE2F,
    ];

    let cp = ch as u32;
    RANGES.iter().any(|r| r.contains(&cp))
}

/// Slugify the given text the way GitHub anchors headings, updating counts
/// so repeated headings get `-1`, `-2`, ... suffixes.
pub fn slugify(text: &str, counts: &mut HashMap<String, usize>) -> String {
    let mut slug = String::new();

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        } else if !ch.is_ascii() && (ch.is_alphanumeric() || is_combining_mark(ch)) {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' {
            slug.push('-');
        }
    }

    let entry = counts.entry(slug.clone()).or_insert(0);
    if *entry > 0 {
        slug.push_str(&format!("-{}", *entry));
    }
    *entry += 1;

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_id_collapses_separators() {
        assert_eq!(generate_id("Heading", "_", "-"), "_heading");
        assert_eq!(generate_id("  What's new?  ", "_", "-"), "_what-s-new");
        assert_eq!(generate_id("A -- B", "", "_"), "a_b");
        assert_eq!(generate_id("Über Größe", "id-", "-"), "id-über-größe");
    }

    #[test]
    fn generate_id_falls_back_to_section() {
        assert_eq!(generate_id("", "_", "-"), "_section");
        assert_eq!(generate_id("--- !!", "", "-"), "section");
    }

    #[test]
    fn native_id_deletes_punctuation() {
        assert_eq!(native_id("What's new?", "_", "_"), "_whats_new");
        assert_eq!(native_id("What's new?", "_", "-"), "_whats-new");
        assert_eq!(native_id("Getting Started", "_", "_"), "_getting_started");
        assert_eq!(native_id("Q&A: Tips & Tricks!", "_", "_"), "_qa_tips_tricks");
    }

    #[test]
    fn native_id_collapses_space_dot_and_hyphen() {
        assert_eq!(native_id("A -- B", "_", "_"), "_a_b");
        assert_eq!(native_id("Version 1.2", "_", "_"), "_version_1_2");
        assert_eq!(native_id("snake_case name", "_", "-"), "_snake_case-name");
        assert_eq!(native_id("Trailing.", "", "-"), "trailing");
        assert_eq!(native_id(" lead", "", "-"), "lead");
    }

    #[test]
    fn native_id_edge_cases() {
        assert_eq!(native_id("???", "_", "_"), "");
        assert_eq!(native_id("???", "_", "-"), "_");
        assert_eq!(native_id("Two Words", "id-", ""), "id-twowords");
        assert_eq!(native_id("Two Words", "_", "+-"), "_two+words");
    }

    #[test]
    fn registry_suffixes_duplicates_from_two() {
        let mut ids = HeadingIdRegistry::new();
        assert_eq!(ids.register("_heading"), "_heading");
        assert_eq!(ids.register("_heading"), "_heading-2");
        assert_eq!(ids.register("_heading"), "_heading-3");
        assert_eq!(ids.peek("_heading-2"), "_heading-2-2");
    }

    #[test]
    fn registry_skips_taken_suffixes() {
        let mut ids = HeadingIdRegistry::new();
        ids.register("intro-2");
        ids.register("intro");
        assert_eq!(ids.register("intro"), "intro-3");
    }

    #[test]
    fn peek_does_not_record() {
        let mut ids = HeadingIdRegistry::new();
        assert_eq!(ids.peek("a"), "a");
        assert_eq!(ids.peek("a"), "a");
        ids.register("a");
        assert_eq!(ids.peek("a"), "a-2");
        assert_eq!(ids.register("a"), "a-2");
    }

    #[test]
    fn github_slugs() {
        let cases = [
            ("Hello World", "hello-world"),
            ("import.meta.glob", "importmetaglob"),
            ("Why Rust?", "why-rust"),
            ("TypeScript & JSX", "typescript--jsx"),
            ("多言語 ガイド", "多言語-ガイド"),
            ("Héllo Wörld", "héllo-wörld"),
            ("स्लॉट्स", "स्लॉट्स"),
        ];
        for (input, expected) in cases {
            let mut counts = HashMap::new();
            assert_eq!(slugify(input, &mut counts), expected, "input {input:?}");
        }
    }

    #[test]
    fn slugger_deduplicates() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.next_slug("Title"), "title");
        assert_eq!(slugger.next_slug("Title"), "title-1");
    }

    #[test]
    fn extract_custom_id_basic() {
        let (text, id) = extract_custom_id("My Heading {#my-heading}  ");
        assert_eq!(text, "My Heading");
        assert_eq!(id, Some("my-heading"));
    }

    #[test]
    fn extract_custom_id_rejects_invalid() {
        assert_eq!(extract_custom_id("Title {#bad id}"), ("Title {#bad id}", None));
        assert_eq!(extract_custom_id("Title {#}"), ("Title {#}", None));
        assert_eq!(extract_custom_id("Plain"), ("Plain", None));
    }
}
