//! # TestLang Parser
//!
//! Recursive-descent parser over the token stream produced by
//! [`crate::lexer::Lexer`], holding exactly one token of lookahead.
//!
//! ## Grammar
//!
//! ```text
//! Program      := ConfigBlock? VariableDecl* TestBlock*
//! ConfigBlock  := "config" "{" ConfigItem* "}"
//! ConfigItem   := "base_url" STRING ";" | "header" STRING STRING ";"
//! VariableDecl := "var" IDENT "=" (STRING | INTEGER) ";"
//! TestBlock    := "test" IDENT "{" Statement* "}"
//! Statement    := Request | Assertion
//! Request      := ("GET" | "POST" | "PUT" | "DELETE") STRING "{" RequestItem* "}"
//! RequestItem  := "header" STRING STRING ";" | "body" STRING ";"
//! Assertion    := "assert_status" "(" INTEGER ")" ";"
//!               | "assert_status_range" "(" INTEGER "," INTEGER ")" ";"
//!               | "assert_header" "(" STRING "," STRING ")" ";"
//!               | "assert_header_contains" "(" STRING "," STRING ")" ";"
//!               | "assert_body_contains" "(" STRING ")" ";"
//! ```
//!
//! Every statement and item starts with its own keyword, so one token of
//! lookahead decides each production. The "at least one test block" rule
//! is left to [`crate::validate`] so it is reported as a semantic error.
//!
//! ## Error Handling
//!
//! The first unexpected token stops parsing with [`FrontendError::Syntax`],
//! naming every token that would have been accepted at that point.

use crate::ast::*;
use crate::errors::{FrontendError, SourcePosition};
use crate::lexer::{Keyword, Lexer, Punct, Token, TokenKind};

/// Parses TestLang source into an Abstract Syntax Tree.
///
/// This is a pure syntactic parser. Use
/// [`crate::validate::validate_program`] to check the semantic rules.
///
/// # Example
///
/// ```rust,ignore
/// use testlang_frontend::parse_program;
///
/// let source = r#"test ping { GET "/ping" { } assert_status(200); assert_body_contains("pong"); }"#;
/// let ast = parse_program(source)?;
/// assert_eq!(ast.tests.len(), 1);
/// ```
pub fn parse_program(source: &str) -> Result<Program, FrontendError> {
    let mut parser = Parser::new(Lexer::new(source)?)?;
    parser.program()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

const STATEMENT_START: &[Keyword] = &[
    Keyword::Get,
    Keyword::Post,
    Keyword::Put,
    Keyword::Delete,
    Keyword::AssertStatus,
    Keyword::AssertStatusRange,
    Keyword::AssertHeader,
    Keyword::AssertHeaderContains,
    Keyword::AssertBodyContains,
];

impl<'a> Parser<'a> {
    fn new(mut lexer: Lexer<'a>) -> Result<Self, FrontendError> {
        let current = next_token(&mut lexer, None)?;
        Ok(Self { lexer, current })
    }

    /// Consumes the current token and returns it.
    fn bump(&mut self) -> Result<Token, FrontendError> {
        if self.current.kind == TokenKind::Eof {
            return Ok(self.current.clone());
        }
        let last = self.current.position;
        let next = next_token(&mut self.lexer, Some(last))?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(kw)
    }

    fn at_punct(&self, p: Punct) -> bool {
        self.current.kind == TokenKind::Punct(p)
    }

    fn unexpected<I, S>(&self, expected: I) -> FrontendError
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        FrontendError::Syntax {
            position: self.current.position,
            expected: expected.into_iter().map(|e| e.to_string()).collect(),
            found: self.current.kind.to_string(),
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<SourcePosition, FrontendError> {
        if !self.at_keyword(kw) {
            return Err(self.unexpected([kw]));
        }
        Ok(self.bump()?.position)
    }

    fn expect_punct(&mut self, p: Punct) -> Result<(), FrontendError> {
        if !self.at_punct(p) {
            return Err(self.unexpected([p]));
        }
        self.bump()?;
        Ok(())
    }

    fn expect_string(&mut self) -> Result<String, FrontendError> {
        if let TokenKind::Str(s) = &mut self.current.kind {
            let s = std::mem::take(s);
            self.bump()?;
            return Ok(s);
        }
        Err(self.unexpected(["string"]))
    }

    fn expect_integer(&mut self) -> Result<i64, FrontendError> {
        match self.current.kind {
            TokenKind::Int(n) => {
                self.bump()?;
                Ok(n)
            }
            _ => Err(self.unexpected(["integer"])),
        }
    }

    fn expect_ident(&mut self) -> Result<String, FrontendError> {
        if let TokenKind::Ident(name) = &mut self.current.kind {
            let name = std::mem::take(name);
            self.bump()?;
            return Ok(name);
        }
        Err(self.unexpected(["identifier"]))
    }

    fn program(&mut self) -> Result<Program, FrontendError> {
        let config = if self.at_keyword(Keyword::Config) {
            Some(self.config_block()?)
        } else {
            None
        };

        let mut variables = Vec::new();
        while self.at_keyword(Keyword::Var) {
            variables.push(self.variable_decl()?);
        }

        let mut tests = Vec::new();
        while self.at_keyword(Keyword::Test) {
            tests.push(self.test_block()?);
        }

        if self.current.kind != TokenKind::Eof {
            let mut expected = Vec::new();
            if tests.is_empty() {
                if config.is_none() && variables.is_empty() {
                    expected.push(Keyword::Config.to_string());
                }
                expected.push(Keyword::Var.to_string());
            }
            expected.push(Keyword::Test.to_string());
            expected.push("end of input".to_string());
            return Err(self.unexpected(expected));
        }

        Ok(Program {
            config,
            variables,
            tests,
        })
    }

    fn config_block(&mut self) -> Result<ConfigBlock, FrontendError> {
        self.expect_keyword(Keyword::Config)?;
        self.expect_punct(Punct::LBrace)?;
        let mut items = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Keyword(Keyword::BaseUrl) => {
                    self.bump()?;
                    let url = self.expect_string()?;
                    self.expect_punct(Punct::Semi)?;
                    items.push(ConfigItem::BaseUrl(url));
                }
                TokenKind::Keyword(Keyword::Header) => {
                    let (key, value) = self.header_pair()?;
                    items.push(ConfigItem::Header { key, value });
                }
                TokenKind::Punct(Punct::RBrace) => {
                    self.bump()?;
                    return Ok(ConfigBlock { items });
                }
                _ => {
                    return Err(self.unexpected([
                        Keyword::BaseUrl.to_string(),
                        Keyword::Header.to_string(),
                        Punct::RBrace.to_string(),
                    ]))
                }
            }
        }
    }

    /// `header STRING STRING ;`
    fn header_pair(&mut self) -> Result<(String, String), FrontendError> {
        self.expect_keyword(Keyword::Header)?;
        let key = self.expect_string()?;
        let value = self.expect_string()?;
        self.expect_punct(Punct::Semi)?;
        Ok((key, value))
    }

    fn variable_decl(&mut self) -> Result<VariableDecl, FrontendError> {
        self.expect_keyword(Keyword::Var)?;
        let name = self.expect_ident()?;
        self.expect_punct(Punct::Eq)?;
        let value = match self.current.kind {
            TokenKind::Str(_) => Value::Str(self.expect_string()?),
            TokenKind::Int(_) => Value::Int(self.expect_integer()?),
            _ => return Err(self.unexpected(["string", "integer"])),
        };
        self.expect_punct(Punct::Semi)?;
        Ok(VariableDecl { name, value })
    }

    fn test_block(&mut self) -> Result<TestBlock, FrontendError> {
        let position = self.expect_keyword(Keyword::Test)?;
        let name = self.expect_ident()?;
        self.expect_punct(Punct::LBrace)?;
        let mut statements = Vec::new();
        loop {
            let stmt = match self.current.kind {
                TokenKind::Punct(Punct::RBrace) => {
                    self.bump()?;
                    return Ok(TestBlock {
                        name,
                        statements,
                        position,
                    });
                }
                TokenKind::Keyword(Keyword::Get) => self.request(Method::Get)?,
                TokenKind::Keyword(Keyword::Post) => self.request(Method::Post)?,
                TokenKind::Keyword(Keyword::Put) => self.request(Method::Put)?,
                TokenKind::Keyword(Keyword::Delete) => self.request(Method::Delete)?,
                TokenKind::Keyword(kw) if STATEMENT_START.contains(&kw) => {
                    Statement::Assertion(self.assertion(kw)?)
                }
                _ => {
                    let expected = STATEMENT_START
                        .iter()
                        .map(ToString::to_string)
                        .chain(std::iter::once(Punct::RBrace.to_string()));
                    return Err(self.unexpected(expected));
                }
            };
            statements.push(stmt);
        }
    }

    fn request(&mut self, method: Method) -> Result<Statement, FrontendError> {
        self.bump()?;
        let path = self.expect_string()?;
        self.expect_punct(Punct::LBrace)?;
        let mut items = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Keyword(Keyword::Header) => {
                    let (key, value) = self.header_pair()?;
                    items.push(RequestItem::Header { key, value });
                }
                TokenKind::Keyword(Keyword::Body) => {
                    self.bump()?;
                    let body = self.expect_string()?;
                    self.expect_punct(Punct::Semi)?;
                    items.push(RequestItem::Body(body));
                }
                TokenKind::Punct(Punct::RBrace) => {
                    self.bump()?;
                    return Ok(Statement::Request(Request {
                        method,
                        path,
                        items,
                    }));
                }
                _ => {
                    return Err(self.unexpected([
                        Keyword::Header.to_string(),
                        Keyword::Body.to_string(),
                        Punct::RBrace.to_string(),
                    ]))
                }
            }
        }
    }

    fn assertion(&mut self, kw: Keyword) -> Result<Assertion, FrontendError> {
        self.expect_keyword(kw)?;
        self.expect_punct(Punct::LParen)?;
        let assertion = match kw {
            Keyword::AssertStatus => Assertion::StatusEquals {
                code: self.expect_integer()?,
            },
            Keyword::AssertStatusRange => {
                let start = self.expect_integer()?;
                self.expect_punct(Punct::Comma)?;
                let end = self.expect_integer()?;
                Assertion::StatusRange { start, end }
            }
            Keyword::AssertHeader => {
                let key = self.expect_string()?;
                self.expect_punct(Punct::Comma)?;
                let value = self.expect_string()?;
                Assertion::HeaderEquals { key, value }
            }
            Keyword::AssertHeaderContains => {
                let key = self.expect_string()?;
                self.expect_punct(Punct::Comma)?;
                let substring = self.expect_string()?;
                Assertion::HeaderContains { key, substring }
            }
            Keyword::AssertBodyContains => Assertion::BodyContains {
                substring: self.expect_string()?,
            },
            other => return Err(self.unexpected([other])),
        };
        self.expect_punct(Punct::RParen)?;
        self.expect_punct(Punct::Semi)?;
        Ok(assertion)
    }
}

/// Pulls the next token, turning an exhausted lexer into a syntax error.
fn next_token(
    lexer: &mut Lexer<'_>,
    after: Option<SourcePosition>,
) -> Result<Token, FrontendError> {
    match lexer.next() {
        Some(token) => token,
        None => Err(FrontendError::Syntax {
            position: after.unwrap_or(SourcePosition::new(1, 1)),
            expected: vec!["more input".to_string()],
            found: TokenKind::Eof.to_string(),
        }),
    }
}
