//! Source-annotated parse errors for request files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors raised while reading a YAML or JSON file
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Failed to read file: {0}")]
    #[diagnostic(code(valuekit::io))]
    Io(#[from] std::io::Error),
}

/// A parse failure pointing at the offending location in the source
#[derive(Debug, Error, Diagnostic)]
#[error("Failed to parse {filename}: {message}")]
#[diagnostic(code(valuekit::parse))]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error, locating it in `content`
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err
            .location()
            .map(|loc| SourceSpan::from((loc.index().min(content.len()), 1)));
        Self::new(err.to_string(), span, content, filename)
    }

    /// Build from a serde_json error, converting its line/column to an offset
    pub fn from_json_error(err: &serde_json::Error, content: &str, filename: &str) -> Self {
        let span = offset_of(content, err.line(), err.column())
            .map(|offset| SourceSpan::from((offset, 1)));
        Self::new(err.to_string(), span, content, filename)
    }

    fn new(message: String, span: Option<SourceSpan>, content: &str, filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            message,
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}

/// Byte offset of a 1-based line and column
fn offset_of(content: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(content.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of_line_and_column() {
        let content = "a: 1\nbb: 2\n";
        assert_eq!(offset_of(content, 1, 1), Some(0));
        assert_eq!(offset_of(content, 2, 2), Some(6));
        assert_eq!(offset_of(content, 0, 0), None);
    }
}
