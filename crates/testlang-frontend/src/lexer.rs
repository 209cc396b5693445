//! # Lexer
//!
//! Turns TestLang source text into a stream of positioned tokens.
//!
//! Token boundaries are recognized by the pest grammar in `grammar.pest`,
//! which also discards whitespace and comments. This module classifies the
//! raw pieces (keyword vs. identifier), resolves string escapes, parses
//! integers, and turns the grammar's error-catching token rules into
//! [`FrontendError::Lexical`] values.

use std::fmt;

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{FrontendError, SourcePosition};

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct TokenGrammar;

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Config,
    BaseUrl,
    Header,
    Var,
    Test,
    Get,
    Post,
    Put,
    Delete,
    Body,
    AssertStatus,
    AssertStatusRange,
    AssertHeader,
    AssertHeaderContains,
    AssertBodyContains,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let kw = match word {
            "config" => Keyword::Config,
            "base_url" => Keyword::BaseUrl,
            "header" => Keyword::Header,
            "var" => Keyword::Var,
            "test" => Keyword::Test,
            "GET" => Keyword::Get,
            "POST" => Keyword::Post,
            "PUT" => Keyword::Put,
            "DELETE" => Keyword::Delete,
            "body" => Keyword::Body,
            "assert_status" => Keyword::AssertStatus,
            "assert_status_range" => Keyword::AssertStatusRange,
            "assert_header" => Keyword::AssertHeader,
            "assert_header_contains" => Keyword::AssertHeaderContains,
            "assert_body_contains" => Keyword::AssertBodyContains,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Config => "config",
            Keyword::BaseUrl => "base_url",
            Keyword::Header => "header",
            Keyword::Var => "var",
            Keyword::Test => "test",
            Keyword::Get => "GET",
            Keyword::Post => "POST",
            Keyword::Put => "PUT",
            Keyword::Delete => "DELETE",
            Keyword::Body => "body",
            Keyword::AssertStatus => "assert_status",
            Keyword::AssertStatusRange => "assert_status_range",
            Keyword::AssertHeader => "assert_header",
            Keyword::AssertHeaderContains => "assert_header_contains",
            Keyword::AssertBodyContains => "assert_body_contains",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semi,
    Comma,
    Eq,
}

impl Punct {
    fn from_char(c: char) -> Option<Self> {
        let p = match c {
            '{' => Punct::LBrace,
            '}' => Punct::RBrace,
            '(' => Punct::LParen,
            ')' => Punct::RParen,
            ';' => Punct::Semi,
            ',' => Punct::Comma,
            '=' => Punct::Eq,
            _ => return None,
        };
        Some(p)
    }

    pub fn as_char(self) -> char {
        match self {
            Punct::LBrace => '{',
            Punct::RBrace => '}',
            Punct::LParen => '(',
            Punct::RParen => ')',
            Punct::Semi => ';',
            Punct::Comma => ',',
            Punct::Eq => '=',
        }
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident(String),
    /// String literal with escapes resolved
    Str(String),
    Int(i64),
    Punct(Punct),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "keyword {}", kw),
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Str(s) => write!(f, "string {:?}", s),
            TokenKind::Int(n) => write!(f, "integer {}", n),
            TokenKind::Punct(p) => write!(f, "{}", p),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: SourcePosition,
}

/// Lazy token stream over a source text.
///
/// Yields exactly one [`TokenKind::Eof`] token at the end. After the first
/// lexical error the iterator is exhausted. Build a new `Lexer` to restart.
pub struct Lexer<'a> {
    pairs: Pairs<'a, Rule>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Result<Self, FrontendError> {
        let mut top = TokenGrammar::parse(Rule::tokens, source).map_err(|e| {
            let offset = match e.location {
                pest::error::InputLocation::Pos(p) => p,
                pest::error::InputLocation::Span((s, _)) => s,
            };
            let position = match e.line_col {
                pest::error::LineColLocation::Pos(lc) => SourcePosition::from_line_col(lc),
                pest::error::LineColLocation::Span(lc, _) => SourcePosition::from_line_col(lc),
            };
            let found = source[offset..].chars().next().unwrap_or('\0');
            FrontendError::lexical(position, found, "unrecognized character")
        })?;
        let tokens = top.next().ok_or_else(|| {
            FrontendError::lexical(SourcePosition::new(1, 1), '\0', "empty token stream")
        })?;
        Ok(Self {
            pairs: tokens.into_inner(),
            done: false,
        })
    }

    fn convert(pair: Pair<'a, Rule>) -> Result<Token, FrontendError> {
        let position = SourcePosition::from_line_col(pair.as_span().start_pos().line_col());
        let text = pair.as_str();
        let kind = match pair.as_rule() {
            Rule::word => match Keyword::from_word(text) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Ident(text.to_string()),
            },
            Rule::string => TokenKind::Str(unescape(&text[1..text.len() - 1], position)?),
            Rule::integer => match text.parse::<i64>() {
                Ok(n) => TokenKind::Int(n),
                Err(_) => {
                    let first = text.chars().next().unwrap_or('0');
                    return Err(FrontendError::lexical(
                        position,
                        first,
                        "integer literal out of range",
                    ));
                }
            },
            Rule::punct => {
                let c = text.chars().next().unwrap_or('\0');
                match Punct::from_char(c) {
                    Some(p) => TokenKind::Punct(p),
                    None => {
                        return Err(FrontendError::lexical(position, c, "unrecognized character"))
                    }
                }
            }
            Rule::unterminated_string => {
                return Err(FrontendError::lexical(
                    position,
                    '"',
                    "unterminated string literal",
                ))
            }
            Rule::unterminated_comment => {
                return Err(FrontendError::lexical(
                    position,
                    '/',
                    "unterminated block comment",
                ))
            }
            Rule::EOI => TokenKind::Eof,
            _ => {
                let c = text.chars().next().unwrap_or('\0');
                return Err(FrontendError::lexical(position, c, "unrecognized character"));
            }
        };
        Ok(Token { kind, position })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, FrontendError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(pair) = self.pairs.next() else {
            self.done = true;
            return None;
        };
        let token = Self::convert(pair);
        if matches!(
            token,
            Err(_)
                | Ok(Token {
                    kind: TokenKind::Eof,
                    ..
                })
        ) {
            self.done = true;
        }
        Some(token)
    }
}

/// Tokenizes the whole source, ending with an `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, FrontendError> {
    Lexer::new(source)?.collect()
}

/// Resolves backslash escapes in the body of a string literal.
///
/// `start` is the position of the opening quote; literals never span lines.
fn unescape(body: &str, start: SourcePosition) -> Result<String, FrontendError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().enumerate();
    while let Some((idx, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // The grammar guarantees a character follows every backslash.
        let (_, escaped) = chars.next().unwrap_or((idx + 1, '\\'));
        match escaped {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            other => {
                return Err(FrontendError::lexical(
                    start.advanced(idx + 1),
                    other,
                    "unknown escape sequence",
                ))
            }
        }
    }
    Ok(out)
}
