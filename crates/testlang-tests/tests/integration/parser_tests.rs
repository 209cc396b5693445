use testlang_frontend::{
    parse_program, Assertion, ConfigItem, FrontendError, Method, RequestItem, SourcePosition,
    Statement, Value,
};

fn syntax_error(src: &str) -> (SourcePosition, Vec<String>, String) {
    match parse_program(src) {
        Err(FrontendError::Syntax {
            position,
            expected,
            found,
        }) => (position, expected, found),
        other => panic!("expected syntax error for {:?}, got {:?}", src, other),
    }
}

#[test]
fn parses_users_example() {
    let src = include_str!("../../../testlang-examples/users.test");
    let ast = parse_program(src).expect("parse");

    let config = ast.config.as_ref().expect("config block");
    assert_eq!(config.items.len(), 3);
    assert_eq!(
        config.items[0],
        ConfigItem::BaseUrl("http://localhost:8080/api".into())
    );
    assert_eq!(ast.base_url(), "http://localhost:8080/api");
    assert_eq!(ast.default_headers().count(), 2);

    assert_eq!(ast.variables.len(), 2);
    assert_eq!(ast.variables[0].name, "id");
    assert_eq!(ast.variables[0].value, Value::Int(42));

    assert_eq!(ast.tests.len(), 2);
    let lifecycle = &ast.tests[1];
    assert_eq!(lifecycle.name, "update_then_delete");
    assert_eq!(lifecycle.requests().count(), 2);
    assert_eq!(lifecycle.assertions().count(), 4);

    match &lifecycle.statements[0] {
        Statement::Request(req) => {
            assert_eq!(req.method, Method::Put);
            assert_eq!(req.path, "/users/$id");
            assert_eq!(req.body(), Some("{\"role\":\"$role\"}"));
            assert!(matches!(req.items[0], RequestItem::Header { .. }));
        }
        other => panic!("expected request, got {:?}", other),
    }
    assert_eq!(
        lifecycle.statements[1],
        Statement::Assertion(Assertion::StatusRange {
            start: 200,
            end: 299
        })
    );
}

#[test]
fn every_assertion_form_parses() {
    let src = r#"
test all {
  GET "/" { }
  assert_status(200);
  assert_status_range(200, 299);
  assert_header("X-App", "demo");
  assert_header_contains("Content-Type", "json");
  assert_body_contains("ok");
}
"#;
    let ast = parse_program(src).expect("parse");
    let kinds: Vec<_> = ast.tests[0].assertions().map(|a| a.keyword()).collect();
    assert_eq!(
        kinds,
        vec![
            "assert_status",
            "assert_status_range",
            "assert_header",
            "assert_header_contains",
            "assert_body_contains"
        ]
    );
}

#[test]
fn test_block_position_is_its_keyword() {
    let ast = parse_program("\n\n   test t { }").expect("parse");
    assert_eq!(ast.tests[0].position, SourcePosition::new(3, 4));
}

#[test]
fn zero_tests_is_syntactically_fine() {
    let ast = parse_program("var a = 1;").expect("parse");
    assert!(ast.tests.is_empty());
}

#[test]
fn missing_semicolon_after_header() {
    let (pos, expected, found) = syntax_error("config {\n  header \"a\" \"b\"\n}");
    assert_eq!(pos, SourcePosition::new(3, 1));
    assert_eq!(expected, vec!["';'"]);
    assert_eq!(found, "'}'");
}

#[test]
fn assertion_requires_parentheses() {
    let (_, expected, found) = syntax_error("test t { GET \"/\" { } assert_status 200; }");
    assert_eq!(expected, vec!["'('"]);
    assert_eq!(found, "integer 200");
}

#[test]
fn request_requires_item_block() {
    let err = parse_program("test t { GET \"/\"; }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at 1:17: expected '{', found ';'"
    );
}

#[test]
fn variables_must_precede_tests() {
    let (_, expected, found) =
        syntax_error("test t { GET \"/\" { } } var late = 1;");
    assert_eq!(expected, vec!["'test'", "end of input"]);
    assert_eq!(found, "keyword 'var'");
}

#[test]
fn variable_value_must_be_literal() {
    let (_, expected, found) = syntax_error("var a = b;");
    assert_eq!(expected, vec!["string", "integer"]);
    assert_eq!(found, "identifier 'b'");
}
