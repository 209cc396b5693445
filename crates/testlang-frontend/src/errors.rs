//! Error types for lexing, parsing and validation.

use std::fmt;

use thiserror::Error;

/// 1-based source position. Columns are counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub(crate) fn from_line_col((line, column): (usize, usize)) -> Self {
        Self {
            line: line as u32,
            column: column as u32,
        }
    }

    /// Position `chars` characters to the right on the same line.
    pub(crate) fn advanced(self, chars: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + chars as u32,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Semantic validation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationContext {
    /// Rule applies to the program as a whole.
    Program,
    /// Rule applies to a single test block.
    TestBlock { test: String },
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program => write!(f, "program"),
            Self::TestBlock { test } => write!(f, "test '{}'", test),
        }
    }
}

/// A single semantic rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub message: String,
    pub context: ValidationContext,
    pub position: Option<SourcePosition>,
}

impl ValidationDiagnostic {
    /// Name of the test block this diagnostic refers to, if any.
    pub fn test_block(&self) -> Option<&str> {
        match &self.context {
            ValidationContext::TestBlock { test } => Some(test),
            ValidationContext::Program => None,
        }
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.context, self.message)?;
        if let Some(pos) = self.position {
            write!(f, " (at {})", pos)?;
        }
        Ok(())
    }
}

/// Errors that can occur during lexing, parsing or validation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontendError {
    /// Malformed token.
    #[error("lexical error at {position}: {message} {found:?}")]
    Lexical {
        position: SourcePosition,
        found: char,
        message: String,
    },

    /// Grammar violation. Parsing stops at the first one.
    #[error("syntax error at {position}: expected {}, found {found}", format_expected(.expected))]
    Syntax {
        position: SourcePosition,
        expected: Vec<String>,
        found: String,
    },

    /// One or more semantic rule violations, in source order.
    #[error("{}", format_diagnostics(.0))]
    Semantic(Vec<ValidationDiagnostic>),
}

impl FrontendError {
    pub(crate) fn lexical(position: SourcePosition, found: char, message: impl Into<String>) -> Self {
        Self::Lexical {
            position,
            found,
            message: message.into(),
        }
    }

    /// Returns the validation diagnostics if this is a semantic error.
    pub fn diagnostics(&self) -> &[ValidationDiagnostic] {
        match self {
            Self::Semantic(diags) => diags,
            _ => &[],
        }
    }
}

/// Renders an expectation set as `a` or `one of {a, b}`.
pub fn format_expected(expected: &[String]) -> String {
    match expected {
        [single] => single.clone(),
        many => format!("one of {{{}}}", many.join(", ")),
    }
}

/// Renders diagnostics one per line, each prefixed the same way.
pub fn format_diagnostics(diags: &[ValidationDiagnostic]) -> String {
    diags
        .iter()
        .map(|d| format!("validation error {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}
