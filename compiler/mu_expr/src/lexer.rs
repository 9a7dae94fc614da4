//! Expression lexer.

use logos::Logos;

use crate::ExprError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    Str,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("//")]
    SlashSlash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
}

/// Expression token.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    Tilde,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Eq,
    Eof,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Int(i) => format!("`{i}`"),
            Token::Float(f) => format!("`{f}`"),
            Token::Str(_) => "string".to_string(),
            Token::Ident(name) => format!("`{name}`"),
            Token::Plus => "`+`".to_string(),
            Token::Minus => "`-`".to_string(),
            Token::Star => "`*`".to_string(),
            Token::StarStar => "`**`".to_string(),
            Token::Slash => "`/`".to_string(),
            Token::SlashSlash => "`//`".to_string(),
            Token::Percent => "`%`".to_string(),
            Token::Tilde => "`~`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::LBracket => "`[`".to_string(),
            Token::RBracket => "`]`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Eq => "`=`".to_string(),
            Token::Eof => "end of expression".to_string(),
        }
    }
}

/// Tokenize an expression. Each token carries its byte offset.
pub(crate) fn lex(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let mut tokens = Vec::new();
    let mut raw = RawToken::lexer(source);
    while let Some(result) = raw.next() {
        let offset = raw.span().start;
        let slice = raw.slice();
        let Ok(kind) = result else {
            return Err(ExprError::syntax(format!("unexpected `{slice}`"), offset));
        };
        let token = match kind {
            RawToken::Int => slice
                .parse()
                .map(Token::Int)
                .map_err(|_| ExprError::syntax("integer literal too large", offset))?,
            RawToken::Float => slice
                .parse()
                .map(Token::Float)
                .map_err(|_| ExprError::syntax("invalid float literal", offset))?,
            RawToken::Str => Token::Str(unquote(slice)),
            RawToken::Ident => Token::Ident(slice.to_string()),
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::StarStar => Token::StarStar,
            RawToken::Slash => Token::Slash,
            RawToken::SlashSlash => Token::SlashSlash,
            RawToken::Percent => Token::Percent,
            RawToken::Tilde => Token::Tilde,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::LBracket => Token::LBracket,
            RawToken::RBracket => Token::RBracket,
            RawToken::Comma => Token::Comma,
            RawToken::Eq => Token::Eq,
        };
        tokens.push((token, offset));
    }
    tokens.push((Token::Eof, source.len()));
    Ok(tokens)
}

/// Strip quotes and resolve `\n`, `\t`, `\\` and escaped quotes.
fn unquote(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}
