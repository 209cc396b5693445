//! Error types for the TestLang compiler.

use testlang_frontend::errors::{format_diagnostics, format_expected};
use testlang_frontend::{FrontendError, SourcePosition, ValidationDiagnostic};
use testlang_ir::LowerError;
use thiserror::Error;

impl From<FrontendError> for CompileError {
    fn from(err: FrontendError) -> Self {
        match err {
            FrontendError::Lexical {
                position,
                found,
                message,
            } => CompileError::Lexical {
                position,
                found,
                message,
            },
            FrontendError::Syntax {
                position,
                expected,
                found,
            } => CompileError::Syntax {
                position,
                expected,
                found,
            },
            FrontendError::Semantic(diagnostics) => CompileError::Semantic { diagnostics },
            _ => CompileError::Internal(format!("unexpected frontend error: {:?}", err)),
        }
    }
}

impl From<LowerError> for CompileError {
    fn from(err: LowerError) -> Self {
        CompileError::Internal(err.to_string())
    }
}

/// Errors that can occur while compiling a TestLang program.
///
/// The pipeline stops at the first failing stage: lexical and syntax errors
/// abort before validation, semantic errors abort before generation. No
/// partial output is ever produced.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CompileError {
    /// Malformed token.
    #[error("lexical error at {position}: {message} {found:?}")]
    Lexical {
        position: SourcePosition,
        found: char,
        message: String,
    },

    /// Grammar violation.
    #[error("syntax error at {position}: expected {}, found {found}", format_expected(.expected))]
    Syntax {
        position: SourcePosition,
        expected: Vec<String>,
        found: String,
    },

    /// One diagnostic per violated validation rule.
    #[error("{}", format_diagnostics(.diagnostics))]
    Semantic {
        diagnostics: Vec<ValidationDiagnostic>,
    },

    /// Generator met an AST shape validation should have rejected
    /// (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CompileError {
    /// Stable identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Lexical { .. } => "lexical",
            CompileError::Syntax { .. } => "syntax",
            CompileError::Semantic { .. } => "semantic",
            CompileError::Internal(_) => "internal",
        }
    }

    /// Process exit code a driver should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Lexical { .. } => 3,
            CompileError::Syntax { .. } => 4,
            CompileError::Semantic { .. } => 5,
            CompileError::Internal(_) => 70,
        }
    }

    /// Source position, for lexical and syntax errors.
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            CompileError::Lexical { position, .. } | CompileError::Syntax { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Test blocks named by a semantic error, without duplicates, in order.
    pub fn test_blocks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let CompileError::Semantic { diagnostics } = self {
            for name in diagnostics.iter().filter_map(|d| d.test_block()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}
