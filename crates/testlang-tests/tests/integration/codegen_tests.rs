use pretty_assertions::assert_eq;
use testlang_core::{compile, compile_with_options, GeneratorOptions, Target};

fn junit(src: &str) -> String {
    compile_with_options(src, &GeneratorOptions::for_target(Target::JUnit)).expect("compile")
}

const PRECEDENCE: &str = r#"
config {
  header "Authorization" "Bearer default";
  header "X-Trace" "on";
}
test override {
  GET "/me" { header "authorization" "Bearer mine"; }
  assert_status(200);
  assert_status(200);
}
"#;

#[test]
fn rust_request_headers_are_set_before_defaults() {
    let out = compile(PRECEDENCE).expect("compile");
    let explicit = out
        .find("put_header(&mut headers, \"authorization\", \"Bearer mine\");")
        .expect("explicit header");
    let defaults = out
        .find("apply_default_headers(&mut headers);")
        .expect("default headers");
    assert!(explicit < defaults);
    assert!(out.contains("if !headers.contains_key(&name) {"));
}

#[test]
fn junit_defaults_skip_explicit_keys_case_insensitively() {
    let out = junit(PRECEDENCE);
    assert!(out.contains("b.header(\"authorization\", \"Bearer mine\");"));
    assert!(out.contains("applyDefaultHeaders(b, \"authorization\");"));
    assert!(out.contains("new TreeSet<>(String.CASE_INSENSITIVE_ORDER)"));
    assert!(out.contains("DEFAULT_HEADERS.put(\"Authorization\", \"Bearer default\");"));
}

#[test]
fn default_headers_keep_declaration_order() {
    let out = compile(PRECEDENCE).expect("compile");
    let auth = out.find("(\"Authorization\", \"Bearer default\"),").expect("auth");
    let trace = out.find("(\"X-Trace\", \"on\"),").expect("trace");
    assert!(auth < trace);
}

#[test]
fn status_range_is_inclusive() {
    let src = r#"test r { GET "/" { } assert_status_range(200, 299); assert_status(200); }"#;
    assert!(compile(src)
        .expect("compile")
        .contains("assert!((200..=299).contains(&resp.status)"));
    assert!(junit(src).contains("resp.statusCode() >= 200 && resp.statusCode() <= 299"));
}

#[test]
fn absolute_urls_skip_base() {
    let src = include_str!("../../../testlang-examples/external.test");
    let out = compile(src).expect("compile");
    assert!(out.contains(".get(\"https://httpbin.org/get\")"));
    assert!(out.contains(".post(\"https://httpbin.org/post\")"));
    assert!(!out.contains("BASE, \"https://"));

    let java = junit(src);
    assert!(java.contains("URI.create(\"https://httpbin.org/get\")"));
}

#[test]
fn header_absence_compares_as_empty() {
    let src = r#"test h { GET "/" { } assert_header("X-None", ""); assert_header_contains("X-None", ""); }"#;
    let out = compile(src).expect("compile");
    assert!(out.contains(".unwrap_or(\"\")"));
    assert!(out.contains("assert_eq!(resp.header(\"X-None\"), \"\");"));
    assert!(junit(src).contains("resp.headers().firstValue(\"X-None\").orElse(\"\")"));
}

#[test]
fn one_test_function_per_block() {
    let src = include_str!("../../../testlang-examples/users.test");
    let out = compile(src).expect("compile");
    assert_eq!(out.matches("#[test]").count(), 2);
    assert_eq!(out.matches("let resp = capture(").count(), 3);
    assert!(out.contains("fn test_get_user() {"));
    assert!(out.contains("fn test_update_then_delete() {"));

    let java = junit(src);
    assert_eq!(java.matches("@Test").count(), 2);
    assert_eq!(java.matches("HttpRequest.Builder b;").count(), 2);
}

#[test]
fn generated_rust_preamble() {
    let src = r#"test p { GET "/" { } assert_status(200); assert_status(200); }"#;
    let out = compile(src).expect("compile");
    let head: Vec<&str> = out.lines().take(9).collect();
    assert_eq!(
        head,
        vec![
            "// @generated by testlang. Do not edit.",
            "#![allow(dead_code, unused_imports)]",
            "",
            "use std::sync::OnceLock;",
            "use std::time::Duration;",
            "",
            "use reqwest::blocking::{Client, Response};",
            "use reqwest::header::{HeaderMap, HeaderName, HeaderValue};",
            "",
        ]
    );
}

#[test]
fn whole_small_test_function() {
    let src = r#"test ping { DELETE "/items/$n" { } assert_status(204); assert_body_contains("gone"); }"#;
    let out = compile(src).expect("compile");
    let start = out.find("#[test]").expect("test fn");
    assert_eq!(
        &out[start..],
        r#"#[test]
fn test_ping() {
    let client = setup();

    let mut headers = HeaderMap::new();
    apply_default_headers(&mut headers);
    let resp = capture(
        client
            .delete(format!("{}{}", BASE, "/items/$n"))
            .timeout(Duration::from_secs(10))
            .headers(headers)
            .send()
            .expect("request failed"),
    );
    assert_eq!(resp.status, 204);
    assert!(resp.body.contains("gone"), "body should contain {:?}", "gone");
}
"#
    );
}
