//! # Semantic Validation
//!
//! Checks program-level rules that the grammar cannot express:
//!
//! - the program contains at least one test block
//! - every test block issues at least one request
//! - every test block carries at least two assertions (counted across the
//!   whole block, not per request)
//! - no assertion appears before the first request of its test block
//! - test block names are unique, since each becomes a generated test procedure
//!
//! Every rule is checked independently and every violation is reported, so a
//! single run surfaces all problems. Assertion kinds are not checked against
//! the request they follow; `assert_body_contains` after a `GET` is fine.

use std::collections::HashSet;

use crate::ast::*;
use crate::errors::{FrontendError, ValidationContext, ValidationDiagnostic};

/// Minimum number of assertion statements per test block.
pub const MIN_ASSERTIONS_PER_TEST: usize = 2;

/// Performs semantic validation on a parsed program.
///
/// # Returns
///
/// * `Ok(())` - Program is valid
/// * `Err(FrontendError::Semantic)` - All violated rules, in source order
///
/// # Example
///
/// ```rust,ignore
/// use testlang_frontend::{parse_program, validate_program};
///
/// let ast = parse_program(source)?;
/// validate_program(&ast)?;
/// ```
pub fn validate_program(program: &Program) -> Result<(), FrontendError> {
    let diagnostics = collect_diagnostics(program);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(FrontendError::Semantic(diagnostics))
    }
}

/// Returns every rule violation in `program`. An empty list means valid.
pub fn collect_diagnostics(program: &Program) -> Vec<ValidationDiagnostic> {
    let mut diagnostics = Vec::new();

    if program.tests.is_empty() {
        diagnostics.push(ValidationDiagnostic {
            message: "program must contain at least one test block".to_string(),
            context: ValidationContext::Program,
            position: None,
        });
    }

    let mut seen = HashSet::new();
    for test in &program.tests {
        if !seen.insert(test.name.as_str()) {
            diagnostics.push(test_diagnostic(
                test,
                format!("duplicate test block name '{}'", test.name),
            ));
        }
        validate_test_block(test, &mut diagnostics);
    }

    diagnostics
}

fn test_diagnostic(test: &TestBlock, message: String) -> ValidationDiagnostic {
    ValidationDiagnostic {
        message,
        context: ValidationContext::TestBlock {
            test: test.name.clone(),
        },
        position: Some(test.position),
    }
}

fn validate_test_block(test: &TestBlock, out: &mut Vec<ValidationDiagnostic>) {
    let requests = test.requests().count();
    let assertions = test.assertions().count();

    if requests == 0 {
        out.push(test_diagnostic(
            test,
            "must contain at least one request".to_string(),
        ));
    }

    if assertions < MIN_ASSERTIONS_PER_TEST {
        out.push(test_diagnostic(
            test,
            format!(
                "must contain at least {} assertions (found {})",
                MIN_ASSERTIONS_PER_TEST, assertions
            ),
        ));
    }

    // Assertions bind to the most recent response, so one must exist.
    let leading = test
        .statements
        .iter()
        .take_while(|s| matches!(s, Statement::Assertion(_)))
        .find_map(|s| match s {
            Statement::Assertion(a) => Some(a),
            Statement::Request(_) => None,
        });
    if let Some(first) = leading {
        out.push(test_diagnostic(
            test,
            format!(
                "assertion '{}' appears before any request",
                first.keyword()
            ),
        ));
    }
}
