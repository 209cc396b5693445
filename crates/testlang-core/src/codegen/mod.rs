//! # Code Generation
//!
//! Turns a validated [`Program`] into the text of one test source file.
//!
//! Generation goes through the [`TestPlan`] IR: lowering resolves the base
//! URL, default headers, variable substitution and assertion binding once,
//! and each backend only decides how that plan is spelled in its target
//! language. Backends write into an explicit [`GenContext`]; output is a
//! pure function of the program and options.
//!
//! Semantics every backend preserves:
//!
//! - relative paths are appended to the base URL, absolute ones used verbatim
//! - explicit request headers win over default headers with the same name
//!   (compared case-insensitively)
//! - `POST`/`PUT` send their first body, or an empty body when none is given
//! - assertions check the response of the most recent request
//! - every string from the source is escaped before it is emitted

pub mod context;
pub mod escape;
pub mod junit;
pub mod rust;

use std::fmt;
use std::str::FromStr;

use testlang_frontend::Program;
use testlang_ir::TestPlan;

use crate::errors::CompileError;

pub use context::GenContext;
pub use junit::JUnitBackend;
pub use rust::RustReqwestBackend;

/// Class name used by the JUnit backend unless configured otherwise.
pub const DEFAULT_CLASS_NAME: &str = "GeneratedTests";

/// Output language of the generated tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    /// Rust `#[test]` functions using `reqwest`'s blocking client.
    #[default]
    Rust,
    /// A JUnit 5 class using `java.net.http`.
    JUnit,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Rust => "rust",
            Target::JUnit => "junit",
        }
    }

    /// File name a driver writes when no output path is given.
    pub fn default_output_file(self) -> &'static str {
        match self {
            Target::Rust => "generated_tests.rs",
            Target::JUnit => "GeneratedTests.java",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" => Ok(Target::Rust),
            "junit" | "java" => Ok(Target::JUnit),
            other => Err(format!("unknown target '{}' (expected rust or junit)", other)),
        }
    }
}

/// Knobs for [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub target: Target,
    /// Name of the generated JUnit class; ignored by the Rust backend.
    pub class_name: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            target: Target::default(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

impl GeneratorOptions {
    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Backend implementing the configured target.
    pub fn backend(&self) -> Box<dyn CodegenBackend> {
        match self.target {
            Target::Rust => Box::new(RustReqwestBackend),
            Target::JUnit => Box::new(JUnitBackend::new(self.class_name.clone())),
        }
    }
}

/// A target language emitter.
pub trait CodegenBackend {
    /// Stable backend identifier for diagnostics/logging.
    fn backend_name(&self) -> &'static str;

    /// Writes the complete test source for `plan` into `ctx`.
    fn emit(&self, plan: &TestPlan, ctx: &mut GenContext);
}

/// Generates test source for a validated program.
///
/// Fails with [`CompileError::Internal`] only if `program` has a shape
/// validation rejects.
pub fn generate(program: &Program, options: &GeneratorOptions) -> Result<String, CompileError> {
    let plan = TestPlan::lower(program)?;
    let backend = options.backend();
    tracing::debug!(
        backend = backend.backend_name(),
        tests = plan.tests.len(),
        requests = plan.request_count(),
        "emitting test source"
    );
    let mut ctx = GenContext::new();
    backend.emit(&plan, &mut ctx);
    Ok(ctx.finish())
}
