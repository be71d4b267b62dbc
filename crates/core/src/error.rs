use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort a single conversion.
///
/// Content anomalies (unmatched TOC markers, duplicate ids, out-of-range
/// heading levels) are never reported here; they are normalized in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A conversion option, or a combination of them, is unusable.
    #[error("Invalid option `{option}`: {message}")]
    InvalidOption {
        /// Name of the offending option
        option: String,
        /// What is wrong with it
        message: String,
    },
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
}

impl ConvertError {
    /// Create a configuration error for the named option
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }

    /// Whether this error stems from the options rather than the content.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidOption { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_option_message_names_the_option() {
        let err = ConvertError::invalid_option("wrap", "width must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid option `wrap`: width must be greater than zero"
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn parse_error_carries_location() {
        let err = ConvertError::parse_error("unexpected end", 3, 7);
        assert_eq!(err.to_string(), "Parse error at 3:7: unexpected end");
        assert!(!err.is_config_error());
    }
}
