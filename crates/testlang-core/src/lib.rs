//! # TestLang Core
//!
//! Compiler pipeline for TestLang: source text in, test source out.
//!
//! ```text
//! source -> lex -> parse -> validate -> lower -> generate
//! ```
//!
//! Each stage either succeeds or aborts the whole compilation with a
//! [`CompileError`]; nothing is generated for a program with errors.

pub mod codegen;
pub mod errors;

// Re-export commonly used types
pub use codegen::{generate, CodegenBackend, GenContext, GeneratorOptions, Target};
pub use errors::CompileError;

/// Compiles `source` into Rust test source with default options.
///
/// # Example
///
/// ```rust,ignore
/// let rust = testlang_core::compile(&std::fs::read_to_string("login.test")?)?;
/// ```
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with_options(source, &GeneratorOptions::default())
}

/// Compiles `source` for the target and class name in `options`.
pub fn compile_with_options(
    source: &str,
    options: &GeneratorOptions,
) -> Result<String, CompileError> {
    let span = tracing::info_span!("compile", target = %options.target);
    let _enter = span.enter();

    let program = parse_and_validate(source)?;
    let output = codegen::generate(&program, options)?;
    tracing::debug!(bytes = output.len(), "generated test source");
    Ok(output)
}

/// Parse and validate a TestLang program.
///
/// Converts frontend errors to [`CompileError`] so callers see one error
/// type for the whole pipeline.
pub fn parse_and_validate(source: &str) -> Result<testlang_frontend::Program, CompileError> {
    let program = testlang_frontend::parse_program(source)?;
    tracing::debug!(
        tests = program.tests.len(),
        variables = program.variables.len(),
        "parsed program"
    );
    if let Err(err) = testlang_frontend::validate_program(&program) {
        tracing::debug!(diagnostics = err.diagnostics().len(), "validation failed");
        return Err(err.into());
    }
    Ok(program)
}
