//! Errors raised while lowering an AST into a test plan.

use thiserror::Error;

/// Lowering failures. Each one means the program skipped or slipped past
/// validation; none is caused by well-formed user input.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LowerError {
    /// An assertion has no preceding request to check.
    #[error("assertion '{assertion}' before any request in test '{test}'")]
    AssertionBeforeRequest {
        test: String,
        assertion: &'static str,
    },
}
