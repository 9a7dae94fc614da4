//! Cooked tokens.

use std::fmt;
use std::ops::Index;

use mu_ir::Span;

/// A token with its span in the macro text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds after cooking.
///
/// `Var` holds the bare name (no `$`, no braces). `Quoted` holds the unescaped
/// contents. A lone `"` or `<` arrives as `Text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Var(String),
    Dollar,
    Quoted(String),
    InlineExpr(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Eq,
    Newline,
    Whitespace(String),
    Text(String),
    Eof,
}

impl TokenKind {
    /// Short description used in parse errors.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Var(_) => "variable",
            TokenKind::Dollar => "`$`",
            TokenKind::Quoted(_) => "quoted string",
            TokenKind::InlineExpr(_) => "inline expression",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Eq => "`=`",
            TokenKind::Newline => "newline",
            TokenKind::Whitespace(_) => "whitespace",
            TokenKind::Text(_) => "text",
            TokenKind::Eof => "end of input",
        }
    }

    /// Whether this is horizontal whitespace.
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Token list, always terminated by `Eof`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenList { tokens }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Kinds without spans, for tests and debugging output.
    pub fn kinds(&self) -> Vec<&TokenKind> {
        self.tokens.iter().map(|t| &t.kind).collect()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}
