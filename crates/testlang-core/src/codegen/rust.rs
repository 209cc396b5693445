//! Rust backend: one `#[test]` function per test block, driving
//! `reqwest::blocking`.
//!
//! The generated file needs `reqwest` (feature `blocking`) as a
//! dependency of whatever crate includes it.

use testlang_frontend::{Assertion, Method};
use testlang_ir::{Body, Exchange, HttpCall, PlannedTest, TestPlan, Url};

use super::context::GenContext;
use super::escape::quoted;
use super::CodegenBackend;

const PRELUDE: &[&str] = &[
    "use std::sync::OnceLock;",
    "use std::time::Duration;",
    "",
    "use reqwest::blocking::{Client, Response};",
    "use reqwest::header::{HeaderMap, HeaderName, HeaderValue};",
];

const SUPPORT: &str = r#"struct Captured {
    status: i64,
    headers: HeaderMap,
    body: String,
}

impl Captured {
    /// Header value, or "" when absent or not valid text.
    fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

fn capture(response: Response) -> Captured {
    let status = i64::from(response.status().as_u16());
    let headers = response.headers().clone();
    let body = response.text().expect("failed to read response body");
    Captured {
        status,
        headers,
        body,
    }
}

fn put_header(headers: &mut HeaderMap, name: &str, value: &str) {
    let name = HeaderName::from_bytes(name.as_bytes()).expect("invalid header name");
    let value = HeaderValue::from_str(value).expect("invalid header value");
    headers.append(name, value);
}

/// Adds each default header the request did not set itself.
fn apply_default_headers(headers: &mut HeaderMap) {
    for (name, value) in DEFAULT_HEADERS.get().into_iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes()).expect("invalid header name");
        if !headers.contains_key(&name) {
            let value = HeaderValue::from_str(value).expect("invalid header value");
            headers.insert(name, value);
        }
    }
}"#;

/// Connect timeout of the shared client, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;
/// Per-request timeout, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct RustReqwestBackend;

impl CodegenBackend for RustReqwestBackend {
    fn backend_name(&self) -> &'static str {
        "rust-reqwest"
    }

    fn emit(&self, plan: &TestPlan, ctx: &mut GenContext) {
        ctx.line("// @generated by testlang. Do not edit.");
        ctx.line("#![allow(dead_code, unused_imports)]");
        ctx.blank();
        for line in PRELUDE {
            ctx.line(line);
        }
        ctx.blank();
        emit_globals(plan, ctx);
        ctx.blank();
        for line in SUPPORT.lines() {
            ctx.line(line);
        }
        for test in &plan.tests {
            ctx.blank();
            emit_test(test, ctx);
        }
    }
}

fn emit_globals(plan: &TestPlan, ctx: &mut GenContext) {
    ctx.line(format!("const BASE: &str = {};", quoted(&plan.base_url)));
    ctx.blank();
    ctx.line("static CLIENT: OnceLock<Client> = OnceLock::new();");
    ctx.line("static DEFAULT_HEADERS: OnceLock<Vec<(&'static str, &'static str)>> = OnceLock::new();");
    ctx.blank();
    ctx.line("/// Builds the shared client and registers default headers once.");
    ctx.block("fn setup() -> &'static Client {", "}", |ctx| {
        ctx.block("DEFAULT_HEADERS.get_or_init(|| {", "});", |ctx| {
            ctx.block("vec![", "]", |ctx| {
                for (name, value) in &plan.default_headers {
                    ctx.line(format!("({}, {}),", quoted(name), quoted(value)));
                }
            });
        });
        ctx.block("CLIENT.get_or_init(|| {", "})", |ctx| {
            ctx.line("Client::builder()");
            ctx.indent();
            ctx.line(format!(
                ".connect_timeout(Duration::from_secs({}))",
                CONNECT_TIMEOUT_SECS
            ));
            ctx.line(".build()");
            ctx.line(".expect(\"failed to build HTTP client\")");
            ctx.dedent();
        });
    });
}

fn emit_test(test: &PlannedTest, ctx: &mut GenContext) {
    ctx.line("#[test]");
    ctx.block(format!("fn test_{}() {{", test.name), "}", |ctx| {
        ctx.line("let client = setup();");
        for exchange in &test.exchanges {
            ctx.blank();
            emit_exchange(exchange, ctx);
        }
    });
}

fn emit_exchange(exchange: &Exchange, ctx: &mut GenContext) {
    let call = &exchange.request;
    ctx.line("let mut headers = HeaderMap::new();");
    for (name, value) in &call.headers {
        ctx.line(format!(
            "put_header(&mut headers, {}, {});",
            quoted(name),
            quoted(value)
        ));
    }
    ctx.line("apply_default_headers(&mut headers);");
    ctx.block("let resp = capture(", ");", |ctx| {
        ctx.line("client");
        ctx.indent();
        emit_call_chain(call, ctx);
        ctx.dedent();
    });
    for check in &exchange.checks {
        ctx.line(assertion(check));
    }
}

fn emit_call_chain(call: &HttpCall, ctx: &mut GenContext) {
    let verb = match call.method {
        Method::Get => "get",
        Method::Post => "post",
        Method::Put => "put",
        Method::Delete => "delete",
    };
    let url = match &call.url {
        Url::Absolute(url) => quoted(url),
        Url::Relative(path) => format!("format!(\"{{}}{{}}\", BASE, {})", quoted(path)),
    };
    ctx.line(format!(".{}({})", verb, url));
    ctx.line(format!(
        ".timeout(Duration::from_secs({}))",
        REQUEST_TIMEOUT_SECS
    ));
    ctx.line(".headers(headers)");
    match &call.body {
        Body::None => {}
        Body::Empty => ctx.line(".body(\"\")"),
        Body::Text(text) => ctx.line(format!(".body({})", quoted(text))),
    }
    ctx.line(".send()");
    ctx.line(".expect(\"request failed\"),");
}

fn assertion(check: &Assertion) -> String {
    match check {
        Assertion::StatusEquals { code } => format!("assert_eq!(resp.status, {});", code),
        Assertion::StatusRange { start, end } => format!(
            "assert!(({start}..={end}).contains(&resp.status), \"Status code should be in range [{start}..{end}], got {{}}\", resp.status);"
        ),
        Assertion::HeaderEquals { key, value } => format!(
            "assert_eq!(resp.header({}), {});",
            quoted(key),
            quoted(value)
        ),
        Assertion::HeaderContains { key, substring } => format!(
            "assert!(resp.header({key}).contains({sub}), \"header {{}} should contain {{:?}}\", {key}, {sub});",
            key = quoted(key),
            sub = quoted(substring)
        ),
        Assertion::BodyContains { substring } => format!(
            "assert!(resp.body.contains({sub}), \"body should contain {{:?}}\", {sub});",
            sub = quoted(substring)
        ),
    }
}
