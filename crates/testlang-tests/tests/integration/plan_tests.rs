use testlang_frontend::{parse_program, Assertion, Method};
use testlang_ir::{Body, TestPlan, Url, VariableTable};

fn plan(src: &str) -> TestPlan {
    let ast = parse_program(src).expect("parse");
    TestPlan::lower(&ast).expect("lower")
}

#[test]
fn login_example_lowers() {
    let src = include_str!("../../../testlang-examples/login.test");
    let plan = plan(src);
    assert_eq!(plan.base_url, "http://localhost:8080/api");
    assert_eq!(
        plan.default_headers,
        vec![("Content-Type".to_string(), "application/json".to_string())]
    );
    assert_eq!(plan.tests.len(), 2);
    assert_eq!(plan.request_count(), 2);

    let call = &plan.tests[0].exchanges[0].request;
    assert_eq!(call.method, Method::Post);
    assert_eq!(call.url, Url::Relative("/login".into()));
    assert_eq!(
        call.body,
        Body::Text(r#"{"username":"admin","password":"1234"}"#.into())
    );
    assert_eq!(plan.tests[0].exchanges[0].checks.len(), 4);
}

#[test]
fn checks_bind_to_preceding_request() {
    let plan = plan(
        r#"test t {
  PUT "/x" { body "a"; }
  assert_status(200);
  DELETE "/x" { }
  assert_status(204);
  assert_body_contains("");
}"#,
    );
    let exchanges = &plan.tests[0].exchanges;
    assert_eq!(exchanges[0].checks, vec![Assertion::StatusEquals { code: 200 }]);
    assert_eq!(exchanges[1].checks.len(), 2);
    assert_eq!(exchanges[1].request.body, Body::None);
}

#[test]
fn substitution_is_not_applied_to_assertions() {
    let plan = plan(
        r#"var id = 7;
test t { GET "/u/$id" { } assert_body_contains("$id"); assert_status(200); }"#,
    );
    let exchange = &plan.tests[0].exchanges[0];
    assert_eq!(exchange.request.url, Url::Relative("/u/7".into()));
    assert_eq!(
        exchange.checks[0],
        Assertion::BodyContains {
            substring: "$id".into()
        }
    );
}

#[test]
fn variable_table_from_source() {
    let ast = parse_program(r#"var a = "x"; var n = -3; var a = "y";"#).expect("parse");
    let vars = VariableTable::from_program(&ast);
    assert_eq!(vars.len(), 2);
    assert_eq!(vars.get("a"), Some("y"));
    assert_eq!(vars.get("n"), Some("-3"));
    assert_eq!(vars.substitute("$n$a$missing"), "-3y$missing");
}
