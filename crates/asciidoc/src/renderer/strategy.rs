use mdadoc_core::{ConversionOptions, WrapMode};

/// How URLs appearing in plain text are emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum UrlStyle {
    /// Left bare so AsciiDoc turns them into links.
    Bare,
    /// Escaped so AsciiDoc prints them as text.
    Escaped,
}

/// Output decisions resolved once per conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct RenderStrategy {
    pub wrap: WrapMode,
    pub urls: UrlStyle,
}

impl From<&ConversionOptions> for RenderStrategy {
    fn from(options: &ConversionOptions) -> Self {
        Self {
            wrap: options.wrap,
            urls: if options.auto_links {
                UrlStyle::Bare
            } else {
                UrlStyle::Escaped
            },
        }
    }
}
