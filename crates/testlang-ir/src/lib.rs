//! # TestLang IR
//!
//! Target-neutral test plan lowered from a validated TestLang program.
//! Code generation backends consume a [`TestPlan`] instead of walking the AST.

pub mod errors;
pub mod plan;
pub mod vars;

// Re-export commonly used types
pub use errors::LowerError;
pub use plan::{Body, Check, Exchange, HttpCall, PlannedTest, TestPlan, Url};
pub use vars::VariableTable;
