use testlang_frontend::lexer::{Keyword, Punct};
use testlang_frontend::{tokenize, FrontendError, SourcePosition, TokenKind};

fn lexical_error(src: &str) -> (SourcePosition, char, String) {
    match tokenize(src) {
        Err(FrontendError::Lexical {
            position,
            found,
            message,
        }) => (position, found, message),
        other => panic!("expected lexical error for {:?}, got {:?}", src, other),
    }
}

#[test]
fn request_line_tokens() {
    let tokens = tokenize("GET \"/users/$id\" { }").expect("tokenize");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword(Keyword::Get),
            TokenKind::Str("/users/$id".into()),
            TokenKind::Punct(Punct::LBrace),
            TokenKind::Punct(Punct::RBrace),
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[1].position, SourcePosition::new(1, 5));
    assert_eq!(tokens[4].position, SourcePosition::new(1, 21));
}

#[test]
fn comments_and_whitespace_are_skipped() {
    let src = "// header\n/* block\n comment */ var\tx = -7; // tail";
    let tokens = tokenize(src).expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Var));
    assert_eq!(tokens[0].position, SourcePosition::new(3, 13));
    assert_eq!(tokens[3].kind, TokenKind::Int(-7));
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

#[test]
fn escapes_resolve_inside_strings() {
    let tokens = tokenize(r#""a\"b\\c\n\t""#).expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Str("a\"b\\c\n\t".into()));
}

#[test]
fn unrecognized_character_position() {
    let (pos, found, message) = lexical_error("test t {\n  GET \"/\" # }");
    assert_eq!(pos, SourcePosition::new(2, 11));
    assert_eq!(found, '#');
    assert_eq!(message, "unrecognized character");
}

#[test]
fn unterminated_string_reported_at_opening_quote() {
    let (pos, found, message) = lexical_error("var x = \"abc\nvar y = 1;");
    assert_eq!(pos, SourcePosition::new(1, 9));
    assert_eq!(found, '"');
    assert_eq!(message, "unterminated string literal");
}

#[test]
fn unknown_escape_reported_at_backslash() {
    let (pos, found, message) = lexical_error("  \"ab\\qc\"");
    assert_eq!(pos, SourcePosition::new(1, 6));
    assert_eq!(found, 'q');
    assert_eq!(message, "unknown escape sequence");
}

#[test]
fn unterminated_block_comment() {
    let (pos, found, _) = lexical_error("var x = 1;\n  /* never closed");
    assert_eq!(pos, SourcePosition::new(2, 3));
    assert_eq!(found, '/');
}

#[test]
fn integer_overflow_is_lexical() {
    let (pos, found, message) = lexical_error("assert_status(99999999999999999999);");
    assert_eq!(pos, SourcePosition::new(1, 15));
    assert_eq!(found, '9');
    assert_eq!(message, "integer literal out of range");
}
