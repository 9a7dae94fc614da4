//! Grammar productions.
//!
//! - `mod.rs`: node sequences and blocks
//! - `calls.rs`: call arguments and the `$(...)` bridge
//! - `definitions.rs`: variable and function definitions

mod calls;
mod definitions;

use mu_ir::{Block, Delimiter, Node, NodeKind, Span};
use mu_lexer::TokenKind;
use mu_stack::ensure_sufficient_stack;

use crate::{Context, ParseError, Parser};

impl Parser<'_> {
    /// Parse nodes until a token that ends `ctx`, or `Eof`.
    ///
    /// The terminating token is left for the caller. Closers that do not
    /// belong to `ctx` are reported as unmatched.
    pub(crate) fn parse_sequence(&mut self, ctx: Context) -> Result<Vec<Node>, ParseError> {
        ensure_sufficient_stack(|| self.parse_sequence_inner(ctx))
    }

    fn parse_sequence_inner(&mut self, ctx: Context) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            let token = self.cursor.current();
            let span = token.span;
            let kind = match &token.kind {
                TokenKind::Eof => break,
                TokenKind::RParen | TokenKind::RBrace => {
                    let delimiter = if token.kind == TokenKind::RParen {
                        Delimiter::Paren
                    } else {
                        Delimiter::Brace
                    };
                    if ctx.closer == Some(delimiter) {
                        break;
                    }
                    return Err(ParseError::Unmatched {
                        closer: delimiter.close(),
                        span,
                    });
                }
                TokenKind::Comma if ctx.comma => break,
                TokenKind::Semicolon | TokenKind::Newline if ctx.statement => break,

                TokenKind::LParen => {
                    nodes.push(self.parse_block(Delimiter::Paren)?);
                    continue;
                }
                TokenKind::LBrace => {
                    nodes.push(self.parse_block(Delimiter::Brace)?);
                    continue;
                }
                TokenKind::Dollar => {
                    nodes.push(self.parse_bridge()?);
                    continue;
                }
                TokenKind::Var(name) => {
                    nodes.push(self.parse_dollar_name(name, ctx)?);
                    continue;
                }

                TokenKind::Comma => NodeKind::Text(",".to_string()),
                TokenKind::Semicolon => NodeKind::Text(";".to_string()),
                TokenKind::Eq => NodeKind::Text("=".to_string()),
                TokenKind::Newline => NodeKind::Newline,
                TokenKind::Whitespace(ws) => NodeKind::Whitespace(ws.clone()),
                TokenKind::Text(text) => NodeKind::Text(text.clone()),
                TokenKind::Quoted(text) => NodeKind::Quoted(text.clone()),
                TokenKind::InlineExpr(source) => NodeKind::InlineExpr(source.clone()),
            };
            tracing::trace!(?kind, %span, "leaf node");
            nodes.push(Node::new(kind, span));
            self.cursor.advance();
        }
        Ok(nodes)
    }

    /// `( ... )` or `{ ... }`, kept with its delimiters.
    fn parse_block(&mut self, delimiter: Delimiter) -> Result<Node, ParseError> {
        let open = self.cursor.current_span();
        self.cursor.advance();
        let nodes = self.parse_sequence(Context::block(delimiter))?;
        let close = self.expect_closer(delimiter, open)?;
        let inner = Span::new(open.end, close.start);
        Ok(Node::new(
            NodeKind::Block {
                delimiter,
                body: Block::new(nodes, inner),
            },
            open.merge(close),
        ))
    }

    /// Consume the closer for a delimiter opened at `open`.
    pub(crate) fn expect_closer(
        &mut self,
        delimiter: Delimiter,
        open: Span,
    ) -> Result<Span, ParseError> {
        let expected = match delimiter {
            Delimiter::Paren => TokenKind::RParen,
            Delimiter::Brace => TokenKind::RBrace,
        };
        if self.cursor.check(&expected) {
            let span = self.cursor.current_span();
            self.cursor.advance();
            Ok(span)
        } else {
            Err(ParseError::Unclosed {
                opener: delimiter.open(),
                span: open,
            })
        }
    }
}

/// Drop trailing whitespace and newlines.
pub(crate) fn trim_trailing_trivia(nodes: &mut Vec<Node>) {
    while nodes.last().is_some_and(Node::is_trivia) {
        nodes.pop();
    }
}

/// Span covering `nodes`, or a point at `fallback` when empty.
pub(crate) fn nodes_span(nodes: &[Node], fallback: u32) -> Span {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => Span::point(fallback),
    }
}
