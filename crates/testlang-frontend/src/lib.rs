//! # TestLang Frontend
//!
//! Lexer, parser, AST, and validation for the TestLang HTTP test DSL.

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod validate;

// Re-export commonly used types
pub use ast::*;
pub use errors::{FrontendError, SourcePosition, ValidationContext, ValidationDiagnostic};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::parse_program;
pub use validate::{collect_diagnostics, validate_program};
