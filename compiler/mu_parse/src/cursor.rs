//! Token cursor for navigating the token stream.

use mu_ir::Span;
use mu_lexer::{Token, TokenKind, TokenList};

/// Cursor over a token list. The last token is always `Eof`, and the
/// position never moves past it.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
    /// For each `(` or `{`, the position of its matching closer.
    closers: Vec<Option<usize>>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens,
            pos: 0,
            closers: match_delimiters(tokens),
        }
    }

    /// Current position, for snapshots.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Roll back to a position returned by [`Cursor::position`].
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos < self.tokens.len(), "cursor position {pos} out of bounds");
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the token before the current one.
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Kind of the token `n` positions ahead, saturating at `Eof`.
    pub fn peek_kind(&self, n: usize) -> &'a TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].kind
    }

    /// Kind of the token at an absolute position, saturating at `Eof`.
    pub fn kind_at(&self, pos: usize) -> &'a TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[pos.min(last)].kind
    }

    /// Position of the closer matching the opener at `pos`, if it has one.
    pub fn matching_closer(&self, pos: usize) -> Option<usize> {
        self.closers.get(pos).copied().flatten()
    }

    /// Move to the next token (no-op at `Eof`).
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Check the current token against a payload-free kind.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Skip horizontal whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.current_kind().is_whitespace() {
            self.advance();
        }
    }

    /// Skip whitespace and newlines.
    pub fn skip_trivia(&mut self) {
        while matches!(
            self.current_kind(),
            TokenKind::Whitespace(_) | TokenKind::Newline
        ) {
            self.advance();
        }
    }

    /// Whether the next non-whitespace token after the current one is `kind`.
    pub fn next_significant_is(&self, kind: &TokenKind) -> bool {
        let mut n = 1;
        while self.peek_kind(n).is_whitespace() {
            n += 1;
        }
        self.peek_kind(n) == kind
    }
}

/// Pair every opener with its closer in one pass. Stray or mismatched
/// closers are skipped; openers left on the stack stay unmatched.
fn match_delimiters(tokens: &TokenList) -> Vec<Option<usize>> {
    let mut closers = vec![None; tokens.len()];
    let mut open: Vec<usize> = Vec::new();
    for (pos, token) in tokens.iter().enumerate() {
        let opener = match token.kind {
            TokenKind::LParen | TokenKind::LBrace => {
                open.push(pos);
                continue;
            }
            TokenKind::RParen => TokenKind::LParen,
            TokenKind::RBrace => TokenKind::LBrace,
            _ => continue,
        };
        if let Some(&start) = open.last() {
            if tokens[start].kind == opener {
                open.pop();
                closers[start] = Some(pos);
            }
        }
    }
    closers
}
