//! Lexer for the Mu prompt macro language using logos.
//!
//! Prompt text is mostly literal, so the lexer is permissive: anything that is
//! not macro syntax becomes a `Text` token, and stray punctuation (`,` `;`
//! `=`) gets its own token so the parser can decide whether it is syntax or
//! literal text in context. A `"` or `<=` with no closer is plain text.
//!
//! The token list always ends with [`TokenKind::Eof`].

mod cook;
mod token;

use logos::{Lexer, Logos};
use mu_diagnostic::{Diagnostic, ErrorCode};
use mu_ir::Span;
use thiserror::Error;

pub use cook::{cook_quoted, cook_var};
pub use token::{Token, TokenKind, TokenList};

/// Raw token from logos (before cooking).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Var,

    #[regex(r"\$\{[A-Za-z_][A-Za-z0-9_]*\}")]
    BracedVar,

    #[token("$")]
    Dollar,

    // `true` when a closing quote was found; a lone `"` is literal text.
    #[token("\"", scan_quoted)]
    Quoted(bool),

    // `<= source =>`. `true` when a closing `=>` was found.
    #[token("<=", scan_inline_expr)]
    InlineExpr(bool),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r#"[^"$(){},;=<\n \t\r]+"#)]
    Text,
}

/// Consume a quoted literal up to its closing unescaped quote.
fn scan_quoted(lex: &mut Lexer<'_, RawToken>) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b'"' => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    false
}

/// Consume an inline expression up to the first `=>`.
fn scan_inline_expr(lex: &mut Lexer<'_, RawToken>) -> bool {
    match lex.remainder().find("=>") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Error produced when the lexer cannot classify input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognized input `{snippet}`")]
pub struct LexError {
    pub snippet: String,
    pub span: Span,
}

impl LexError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E1004
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string()).with_span(self.span)
    }
}

/// Lex macro source into tokens.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let mut tokens = Vec::new();
    let mut raw = RawToken::lexer(source);

    while let Some(result) = raw.next() {
        let span = Span::from_range(raw.span());
        let slice = raw.slice();
        let Ok(kind) = result else {
            return Err(LexError {
                snippet: slice.to_string(),
                span,
            });
        };
        tokens.push(Token::new(convert(kind, slice), span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
    tracing::trace!(count = tokens.len(), "lexed macro source");
    Ok(TokenList::new(tokens))
}

fn convert(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Var | RawToken::BracedVar => TokenKind::Var(cook_var(slice).to_string()),
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::Quoted(true) => TokenKind::Quoted(cook_quoted(slice)),
        RawToken::Quoted(false) | RawToken::InlineExpr(false) => {
            TokenKind::Text(slice.to_string())
        }
        RawToken::InlineExpr(true) => {
            let inner = slice
                .strip_prefix("<=")
                .and_then(|s| s.strip_suffix("=>"))
                .unwrap_or("");
            TokenKind::InlineExpr(inner.to_string())
        }
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Lt => TokenKind::Text("<".to_string()),
        RawToken::Newline => TokenKind::Newline,
        RawToken::Whitespace => TokenKind::Whitespace(slice.to_string()),
        RawToken::Text => TokenKind::Text(slice.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
