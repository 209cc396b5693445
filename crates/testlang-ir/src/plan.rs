//! Test plan lowered from the AST.
//!
//! Lowering resolves everything a backend would otherwise recompute:
//! the effective base URL, default header order, variable substitution,
//! absolute vs. relative URLs, which body (if any) each request sends, and
//! which response each assertion checks.

use testlang_frontend::ast::{Assertion, Method, Program, Statement, TestBlock};

use crate::errors::LowerError;
use crate::vars::VariableTable;

/// Whole-program plan consumed by code generation backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    /// Configured base URL, or the default one
    pub base_url: String,
    /// Default headers in declaration order
    pub default_headers: Vec<(String, String)>,
    pub tests: Vec<PlannedTest>,
}

/// One generated test procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTest {
    pub name: String,
    pub exchanges: Vec<Exchange>,
}

/// A request together with the assertions that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub request: HttpCall,
    pub checks: Vec<Check>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCall {
    pub method: Method,
    pub url: Url,
    /// Request-level headers in declaration order
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpCall {
    /// Header names set on the request itself.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|(k, _)| k.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Url {
    /// Used verbatim (`http://` or `https://` prefix)
    Absolute(String),
    /// Appended to the base URL
    Relative(String),
}

impl Url {
    pub fn classify(path: String) -> Self {
        if path.starts_with("http://") || path.starts_with("https://") {
            Url::Absolute(path)
        } else {
            Url::Relative(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// `GET` / `DELETE`
    None,
    /// `POST` / `PUT` without a `body` item
    Empty,
    /// First `body` item, variables substituted
    Text(String),
}

/// An assertion on the response of the enclosing exchange.
pub type Check = Assertion;

impl TestPlan {
    /// Lowers a validated program.
    ///
    /// Fails only on shapes validation rejects, e.g. an assertion before the
    /// first request of a test block.
    pub fn lower(program: &Program) -> Result<Self, LowerError> {
        let vars = VariableTable::from_program(program);
        let tests = program
            .tests
            .iter()
            .map(|test| lower_test(test, &vars))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            base_url: program.base_url().to_string(),
            default_headers: program
                .default_headers()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tests,
        })
    }

    pub fn request_count(&self) -> usize {
        self.tests.iter().map(|t| t.exchanges.len()).sum()
    }
}

impl TryFrom<&Program> for TestPlan {
    type Error = LowerError;

    fn try_from(program: &Program) -> Result<Self, Self::Error> {
        Self::lower(program)
    }
}

fn lower_test(test: &TestBlock, vars: &VariableTable) -> Result<PlannedTest, LowerError> {
    let mut exchanges: Vec<Exchange> = Vec::new();
    for stmt in &test.statements {
        match stmt {
            Statement::Request(req) => {
                let body = if !req.method.sends_body() {
                    Body::None
                } else {
                    match req.body() {
                        Some(text) => Body::Text(vars.substitute(text)),
                        None => Body::Empty,
                    }
                };
                exchanges.push(Exchange {
                    request: HttpCall {
                        method: req.method,
                        url: Url::classify(vars.substitute(&req.path)),
                        headers: req
                            .headers()
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .collect(),
                        body,
                    },
                    checks: Vec::new(),
                });
            }
            Statement::Assertion(assertion) => match exchanges.last_mut() {
                Some(exchange) => exchange.checks.push(assertion.clone()),
                None => {
                    return Err(LowerError::AssertionBeforeRequest {
                        test: test.name.clone(),
                        assertion: assertion.keyword(),
                    })
                }
            },
        }
    }
    Ok(PlannedTest {
        name: test.name.clone(),
        exchanges,
    })
}
