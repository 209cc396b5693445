//! # Abstract Syntax Tree
//!
//! Data structures for a parsed TestLang program.
//!
//! ## Structure
//!
//! A program consists of:
//! - an optional **config block** declaring the base URL and default headers
//! - **variable declarations** usable as `$name` inside request paths and bodies
//! - one or more **test blocks**, each an ordered list of requests and assertions
//!
//! Nodes are plain owned values. The parser builds them once; validation and
//! lowering only read them.

use std::fmt;

use crate::errors::SourcePosition;

/// Base URL used when no config block declares one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// The root of a parsed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Optional `config { ... }` block
    pub config: Option<ConfigBlock>,
    /// `var` declarations in source order
    pub variables: Vec<VariableDecl>,
    /// `test` blocks in source order
    pub tests: Vec<TestBlock>,
}

impl Program {
    /// The effective base URL: the first `base_url` item wins.
    pub fn base_url(&self) -> &str {
        self.config
            .iter()
            .flat_map(|c| c.items.iter())
            .find_map(|item| match item {
                ConfigItem::BaseUrl(url) => Some(url.as_str()),
                ConfigItem::Header { .. } => None,
            })
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Default headers from the config block, in declaration order.
    pub fn default_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.config
            .iter()
            .flat_map(|c| c.items.iter())
            .filter_map(|item| match item {
                ConfigItem::Header { key, value } => Some((key.as_str(), value.as_str())),
                ConfigItem::BaseUrl(_) => None,
            })
    }
}

/// `config { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigBlock {
    pub items: Vec<ConfigItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigItem {
    /// `base_url "...";`
    BaseUrl(String),
    /// `header "key" "value";`
    Header { key: String, value: String },
}

/// `var name = value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: String,
    pub value: Value,
}

/// A literal value. Only strings and integers exist in the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
}

impl fmt::Display for Value {
    /// Textual form used for `$name` substitution.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
        }
    }
}

/// `test name { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlock {
    pub name: String,
    pub statements: Vec<Statement>,
    /// Position of the `test` keyword
    pub position: SourcePosition,
}

impl TestBlock {
    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Request(r) => Some(r),
            Statement::Assertion(_) => None,
        })
    }

    pub fn assertions(&self) -> impl Iterator<Item = &Assertion> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Assertion(a) => Some(a),
            Statement::Request(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Request(Request),
    Assertion(Assertion),
}

/// HTTP method of a request statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether requests with this method send a body.
    pub fn sends_body(self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `METHOD "path" { items }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Relative to the base URL, or absolute (`http://` / `https://`)
    pub path: String,
    pub items: Vec<RequestItem>,
}

impl Request {
    /// The first `body` item. Later ones are ignored.
    pub fn body(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            RequestItem::Body(b) => Some(b.as_str()),
            RequestItem::Header { .. } => None,
        })
    }

    /// Request-level headers in declaration order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match item {
            RequestItem::Header { key, value } => Some((key.as_str(), value.as_str())),
            RequestItem::Body(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestItem {
    /// `header "key" "value";`
    Header { key: String, value: String },
    /// `body "...";`
    Body(String),
}

/// An assertion on the most recent response in the enclosing test block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// `assert_status(code);`
    StatusEquals { code: i64 },
    /// `assert_status_range(start, end);` with inclusive bounds
    StatusRange { start: i64, end: i64 },
    /// `assert_header("key", "value");`
    HeaderEquals { key: String, value: String },
    /// `assert_header_contains("key", "substring");`
    HeaderContains { key: String, substring: String },
    /// `assert_body_contains("substring");`
    BodyContains { substring: String },
}

impl Assertion {
    /// The DSL keyword that introduces this assertion.
    pub fn keyword(&self) -> &'static str {
        match self {
            Assertion::StatusEquals { .. } => "assert_status",
            Assertion::StatusRange { .. } => "assert_status_range",
            Assertion::HeaderEquals { .. } => "assert_header",
            Assertion::HeaderContains { .. } => "assert_header_contains",
            Assertion::BodyContains { .. } => "assert_body_contains",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(items: Vec<ConfigItem>) -> Program {
        Program {
            config: Some(ConfigBlock { items }),
            variables: vec![],
            tests: vec![],
        }
    }

    #[test]
    fn base_url_defaults_without_config() {
        let program = Program {
            config: None,
            variables: vec![],
            tests: vec![],
        };
        assert_eq!(program.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn first_base_url_wins() {
        let program = config(vec![
            ConfigItem::Header {
                key: "X-A".into(),
                value: "1".into(),
            },
            ConfigItem::BaseUrl("http://first".into()),
            ConfigItem::BaseUrl("http://second".into()),
        ]);
        assert_eq!(program.base_url(), "http://first");
    }

    #[test]
    fn default_headers_keep_declaration_order() {
        let program = config(vec![
            ConfigItem::Header {
                key: "X-B".into(),
                value: "2".into(),
            },
            ConfigItem::BaseUrl("http://x".into()),
            ConfigItem::Header {
                key: "X-A".into(),
                value: "1".into(),
            },
        ]);
        let headers: Vec<_> = program.default_headers().collect();
        assert_eq!(headers, vec![("X-B", "2"), ("X-A", "1")]);
    }

    #[test]
    fn first_body_item_is_used() {
        let req = Request {
            method: Method::Post,
            path: "/x".into(),
            items: vec![
                RequestItem::Header {
                    key: "A".into(),
                    value: "b".into(),
                },
                RequestItem::Body("first".into()),
                RequestItem::Body("second".into()),
            ],
        };
        assert_eq!(req.body(), Some("first"));
        assert_eq!(req.headers().count(), 1);
    }

    #[test]
    fn integer_values_render_in_decimal() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::Str("abc".into()).to_string(), "abc");
    }

    #[test]
    fn only_post_and_put_send_bodies() {
        assert!(!Method::Get.sends_body());
        assert!(!Method::Delete.sends_body());
        assert!(Method::Post.sends_body());
        assert!(Method::Put.sends_body());
    }
}
