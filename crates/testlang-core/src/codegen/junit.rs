//! JUnit 5 backend: one class, one `@Test` method per test block, using
//! `java.net.http.HttpClient`.

use testlang_frontend::{Assertion, Method};
use testlang_ir::{Body, Exchange, PlannedTest, TestPlan, Url};

use super::context::GenContext;
use super::escape::quoted;
use super::CodegenBackend;

const IMPORTS: &[&str] = &[
    "import org.junit.jupiter.api.*;",
    "import static org.junit.jupiter.api.Assertions.*;",
    "import java.net.http.*;",
    "import java.net.*;",
    "import java.time.Duration;",
    "import java.nio.charset.StandardCharsets;",
    "import java.util.*;",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JUnitBackend {
    class_name: String,
}

impl JUnitBackend {
    /// Falls back to [`super::DEFAULT_CLASS_NAME`] when `class_name` is not
    /// a usable Java class name.
    pub fn new(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        if is_class_name(&class_name) {
            Self { class_name }
        } else {
            tracing::warn!(class_name = %class_name, "invalid Java class name, using default");
            Self {
                class_name: super::DEFAULT_CLASS_NAME.to_string(),
            }
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl Default for JUnitBackend {
    fn default() -> Self {
        Self::new(super::DEFAULT_CLASS_NAME)
    }
}

impl CodegenBackend for JUnitBackend {
    fn backend_name(&self) -> &'static str {
        "junit5"
    }

    fn emit(&self, plan: &TestPlan, ctx: &mut GenContext) {
        ctx.line("// Generated by testlang. Do not edit.");
        for line in IMPORTS {
            ctx.line(line);
        }
        ctx.blank();
        ctx.block(format!("public class {} {{", self.class_name), "}", |ctx| {
            emit_fixture(plan, ctx);
            for test in &plan.tests {
                ctx.blank();
                emit_test(test, ctx);
            }
        });
    }
}

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "var", "void", "volatile", "while", "_",
];

/// `[A-Za-z_$][A-Za-z0-9_$]*`, excluding reserved words.
pub fn is_class_name(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$');
    head_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !JAVA_RESERVED.contains(&name)
}

fn emit_fixture(plan: &TestPlan, ctx: &mut GenContext) {
    ctx.line(format!("static String BASE = {};", quoted(&plan.base_url)));
    ctx.line("static Map<String, String> DEFAULT_HEADERS = new LinkedHashMap<>();");
    ctx.line("static HttpClient client;");
    ctx.blank();
    ctx.line("@BeforeAll");
    ctx.block("static void setup() {", "}", |ctx| {
        ctx.line("client = HttpClient.newBuilder()");
        ctx.indent();
        ctx.line(".connectTimeout(Duration.ofSeconds(5))");
        ctx.line(".build();");
        ctx.dedent();
        for (name, value) in &plan.default_headers {
            ctx.line(format!(
                "DEFAULT_HEADERS.put({}, {});",
                quoted(name),
                quoted(value)
            ));
        }
    });
    ctx.blank();
    ctx.line("/** Adds each default header whose name is not in {@code explicit}. */");
    ctx.block(
        "static void applyDefaultHeaders(HttpRequest.Builder b, String... explicit) {",
        "}",
        |ctx| {
            ctx.line("Set<String> taken = new TreeSet<>(String.CASE_INSENSITIVE_ORDER);");
            ctx.line("taken.addAll(Arrays.asList(explicit));");
            ctx.block(
                "for (Map.Entry<String, String> h : DEFAULT_HEADERS.entrySet()) {",
                "}",
                |ctx| {
                    ctx.block("if (!taken.contains(h.getKey())) {", "}", |ctx| {
                        ctx.line("b.header(h.getKey(), h.getValue());");
                    });
                },
            );
        },
    );
}

fn emit_test(test: &PlannedTest, ctx: &mut GenContext) {
    ctx.line("@Test");
    ctx.block(
        format!("void test_{}() throws Exception {{", test.name),
        "}",
        |ctx| {
            ctx.line("HttpRequest.Builder b;");
            ctx.line("HttpResponse<String> resp;");
            for exchange in &test.exchanges {
                ctx.blank();
                emit_exchange(exchange, ctx);
            }
        },
    );
}

fn emit_exchange(exchange: &Exchange, ctx: &mut GenContext) {
    let call = &exchange.request;
    let uri = match &call.url {
        Url::Absolute(url) => quoted(url),
        Url::Relative(path) => format!("BASE + {}", quoted(path)),
    };
    ctx.line(format!("b = HttpRequest.newBuilder(URI.create({}))", uri));
    ctx.indent();
    ctx.line(format!("{};", method_call(call.method, &call.body)));
    ctx.dedent();
    let explicit: Vec<String> = call.headers.iter().map(|(k, _)| quoted(k)).collect();
    for (name, value) in &call.headers {
        ctx.line(format!("b.header({}, {});", quoted(name), quoted(value)));
    }
    if explicit.is_empty() {
        ctx.line("applyDefaultHeaders(b);");
    } else {
        ctx.line(format!("applyDefaultHeaders(b, {});", explicit.join(", ")));
    }
    ctx.line(
        "resp = client.send(b.build(), HttpResponse.BodyHandlers.ofString(StandardCharsets.UTF_8));",
    );
    for check in &exchange.checks {
        ctx.line(assertion(check));
    }
}

fn method_call(method: Method, body: &Body) -> String {
    let publisher = match body {
        Body::None | Body::Empty => "HttpRequest.BodyPublishers.ofString(\"\")".to_string(),
        Body::Text(text) => format!("HttpRequest.BodyPublishers.ofString({})", quoted(text)),
    };
    match method {
        Method::Get => ".timeout(Duration.ofSeconds(10)).GET()".to_string(),
        Method::Delete => ".timeout(Duration.ofSeconds(10)).DELETE()".to_string(),
        Method::Post => format!(".timeout(Duration.ofSeconds(10)).POST({})", publisher),
        Method::Put => format!(".timeout(Duration.ofSeconds(10)).PUT({})", publisher),
    }
}

/// Integer literal that also type-checks when outside the `int` range.
fn java_int(n: i64) -> String {
    if i32::try_from(n).is_ok() {
        n.to_string()
    } else {
        format!("{}L", n)
    }
}

fn assertion(check: &Assertion) -> String {
    match check {
        Assertion::StatusEquals { code } => {
            if i32::try_from(*code).is_ok() {
                format!("assertEquals({}, resp.statusCode());", code)
            } else {
                format!("assertEquals({}, (long) resp.statusCode());", java_int(*code))
            }
        }
        Assertion::StatusRange { start, end } => format!(
            "assertTrue(resp.statusCode() >= {lo} && resp.statusCode() <= {hi}, \"Status code should be in range [{start}..{end}]\");",
            lo = java_int(*start),
            hi = java_int(*end),
        ),
        Assertion::HeaderEquals { key, value } => format!(
            "assertEquals({}, resp.headers().firstValue({}).orElse(\"\"));",
            quoted(value),
            quoted(key)
        ),
        Assertion::HeaderContains { key, substring } => format!(
            "assertTrue(resp.headers().firstValue({}).orElse(\"\").contains({}));",
            quoted(key),
            quoted(substring)
        ),
        Assertion::BodyContains { substring } => {
            format!("assertTrue(resp.body().contains({}));", quoted(substring))
        }
    }
}
