use testlang_frontend::{
    collect_diagnostics, parse_program, validate_program, FrontendError, SourcePosition,
    ValidationContext,
};

fn diagnostics(src: &str) -> Vec<String> {
    let ast = parse_program(src).expect("parse");
    collect_diagnostics(&ast)
        .into_iter()
        .map(|d| d.to_string())
        .collect()
}

#[test]
fn examples_in_source_validate() {
    let ast = parse_program(
        r#"test ok { GET "/a" { } assert_status(200); GET "/b" { } assert_status(404); }"#,
    )
    .expect("parse");
    assert!(validate_program(&ast).is_ok());
}

#[test]
fn empty_program_fails() {
    assert_eq!(
        diagnostics("// nothing here\n"),
        vec!["[program] program must contain at least one test block"]
    );
}

#[test]
fn diagnostics_point_at_test_keyword() {
    let ast = parse_program("var a = 1;\n  test thin {\n GET \"/\" { }\n assert_status(200);\n}")
        .expect("parse");
    let diags = collect_diagnostics(&ast);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].position, Some(SourcePosition::new(2, 3)));
    assert_eq!(
        diags[0].context,
        ValidationContext::TestBlock {
            test: "thin".into()
        }
    );
}

#[test]
fn every_failing_block_is_reported() {
    let src = r#"
test a { assert_status(200); }
test b { GET "/" { } assert_status(200); assert_status(201); }
test c { }
"#;
    let ast = parse_program(src).expect("parse");
    let err = validate_program(&ast).unwrap_err();
    let blocks: Vec<_> = err
        .diagnostics()
        .iter()
        .filter_map(|d| d.test_block())
        .collect();
    // a: no request, too few assertions, assertion first; c: no request, too few assertions
    assert_eq!(blocks, vec!["a", "a", "a", "c", "c"]);
    assert!(matches!(err, FrontendError::Semantic(_)));
}

#[test]
fn assertions_may_mix_freely_after_get() {
    let src = r#"test t { GET "/" { } assert_body_contains("x"); assert_header("A", "b"); }"#;
    assert!(diagnostics(src).is_empty());
}
