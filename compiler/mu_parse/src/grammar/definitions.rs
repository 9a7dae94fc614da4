//! Variable definitions, function definitions and the `$name` forms.

use std::sync::Arc;

use mu_ir::{Block, Delimiter, FunctionDef, Node, NodeKind, Param, Span};
use mu_lexer::TokenKind;

use super::{nodes_span, trim_trailing_trivia};
use crate::{Context, ParseError, Parser};

impl Parser<'_> {
    /// Everything that starts with `$name`: reference, variable definition,
    /// function definition or call.
    pub(crate) fn parse_dollar_name(
        &mut self,
        name: &str,
        ctx: Context,
    ) -> Result<Node, ParseError> {
        let start = self.cursor.current_span();

        if self.cursor.peek_kind(1) == &TokenKind::LParen {
            self.cursor.advance();
            if self.is_definition_header() {
                let params = self.parse_param_header()?;
                return self.parse_function_body(name, params, start);
            }
            tracing::trace!(name, "not a definition, parsing as call");
            let args = self.parse_args()?;
            let span = start.merge(self.cursor.previous_span());
            return Ok(Node::new(
                NodeKind::Call {
                    name: name.to_string(),
                    args,
                },
                span,
            ));
        }

        if self.cursor.next_significant_is(&TokenKind::Eq) {
            return self.parse_var_def(name, start, ctx);
        }

        self.cursor.advance();
        Ok(Node::new(NodeKind::Var(name.to_string()), start))
    }

    /// `$name = init` terminated by `;`, newline, the enclosing closer or
    /// `Eof`. `;` and newline are consumed.
    fn parse_var_def(&mut self, name: &str, start: Span, ctx: Context) -> Result<Node, ParseError> {
        self.cursor.advance();
        self.cursor.skip_whitespace();
        self.cursor.advance();
        self.cursor.skip_whitespace();

        let value_start = self.cursor.current_span().start;
        let mut nodes = self.parse_sequence(Context::var_init(ctx))?;
        trim_trailing_trivia(&mut nodes);
        let value = if nodes.is_empty() {
            None
        } else {
            let span = nodes_span(&nodes, value_start);
            Some(Arc::new(Block::new(nodes, span)))
        };

        if matches!(
            self.cursor.current_kind(),
            TokenKind::Semicolon | TokenKind::Newline
        ) {
            self.cursor.advance();
        }
        let span = start.merge(self.cursor.previous_span());
        tracing::trace!(name, %span, "variable definition");
        Ok(Node::new(
            NodeKind::VarDef {
                name: name.to_string(),
                value,
            },
            span,
        ))
    }

    /// Whether the `(` at the cursor opens a parameter list followed by `= {`.
    ///
    /// Token scan only. Nested groups are jumped over with the cursor's
    /// delimiter table, so each token is visited by at most one scan.
    fn is_definition_header(&self) -> bool {
        let cursor = &self.cursor;
        let Some(close) = cursor.matching_closer(cursor.position()) else {
            return false;
        };
        let skip_trivia = |mut pos: usize| {
            while matches!(
                cursor.kind_at(pos),
                TokenKind::Whitespace(_) | TokenKind::Newline
            ) {
                pos += 1;
            }
            pos
        };
        let skip_whitespace = |mut pos: usize| {
            while cursor.kind_at(pos).is_whitespace() {
                pos += 1;
            }
            pos
        };

        let mut pos = skip_trivia(cursor.position() + 1);
        while pos != close {
            match cursor.kind_at(pos) {
                TokenKind::Var(_) => {}
                TokenKind::Text(text) if is_param_name(text) => {}
                _ => return false,
            }
            pos = skip_whitespace(pos + 1);

            if cursor.kind_at(pos) == &TokenKind::Eq {
                pos += 1;
                // The default runs to the next top-level `,` or the closer.
                while pos != close && cursor.kind_at(pos) != &TokenKind::Comma {
                    match cursor.kind_at(pos) {
                        TokenKind::LParen | TokenKind::LBrace => {
                            let Some(end) = cursor.matching_closer(pos) else {
                                return false;
                            };
                            pos = end + 1;
                        }
                        TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => return false,
                        _ => pos += 1,
                    }
                }
            }

            pos = skip_trivia(pos);
            match cursor.kind_at(pos) {
                TokenKind::Comma => {
                    pos = skip_trivia(pos + 1);
                    if pos == close {
                        return false;
                    }
                }
                _ if pos == close => {}
                _ => return false,
            }
        }

        let pos = skip_whitespace(close + 1);
        cursor.kind_at(pos) == &TokenKind::Eq
            && cursor.kind_at(skip_trivia(pos + 1)) == &TokenKind::LBrace
    }

    /// `( params ) = {`, leaving the cursor after the `{`.
    fn parse_param_header(&mut self) -> Result<Vec<Param>, ParseError> {
        self.cursor.advance();
        self.cursor.skip_trivia();

        let mut params = Vec::new();
        if self.cursor.check(&TokenKind::RParen) {
            self.cursor.advance();
        } else {
            loop {
                params.push(self.parse_param()?);
                self.cursor.skip_trivia();
                match self.cursor.current_kind() {
                    TokenKind::Comma => {
                        self.cursor.advance();
                        self.cursor.skip_trivia();
                    }
                    TokenKind::RParen => {
                        self.cursor.advance();
                        break;
                    }
                    other => return Err(self.unexpected("`,` or `)`", other)),
                }
            }
        }

        self.cursor.skip_whitespace();
        self.expect_token(&TokenKind::Eq, "`=`")?;
        self.cursor.skip_trivia();
        self.expect_token(&TokenKind::LBrace, "`{`")?;
        Ok(params)
    }

    /// `$p`, `p`, `$p = default` or `p = default`.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.cursor.current_span();
        let name = match self.cursor.current_kind() {
            TokenKind::Var(name) => name.clone(),
            TokenKind::Text(text) if is_param_name(text) => text.clone(),
            other => return Err(self.unexpected("parameter name", other)),
        };
        self.cursor.advance();
        self.cursor.skip_whitespace();

        let mut span = start;
        let default = if self.cursor.check(&TokenKind::Eq) {
            self.cursor.advance();
            self.cursor.skip_whitespace();
            let value_start = self.cursor.current_span().start;
            let mut nodes = self.parse_sequence(Context::ARGS)?;
            trim_trailing_trivia(&mut nodes);
            let value_span = nodes_span(&nodes, value_start);
            span = span.merge(value_span);
            Some(Arc::new(Block::new(nodes, value_span)))
        } else {
            None
        };

        Ok(Param {
            name,
            default,
            span,
        })
    }

    /// Body of a definition whose `(params) = {` has been consumed.
    fn parse_function_body(
        &mut self,
        name: &str,
        params: Vec<Param>,
        start: Span,
    ) -> Result<Node, ParseError> {
        let open = self.cursor.previous_span();
        let nodes = self.parse_sequence(Context::block(Delimiter::Brace))?;
        let close = self.expect_closer(Delimiter::Brace, open)?;
        let span = start.merge(close);
        tracing::trace!(name, params = params.len(), "function definition");
        let def = FunctionDef {
            name: name.to_string(),
            params,
            body: Block::new(nodes, Span::new(open.end, close.start)),
            span,
        };
        Ok(Node::new(NodeKind::FunctionDef(Arc::new(def)), span))
    }

    fn expect_token(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.cursor.check(kind) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected, self.cursor.current_kind()))
        }
    }

    fn unexpected(&self, expected: &'static str, found: &TokenKind) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: found.describe(),
            span: self.cursor.current_span(),
        }
    }
}

/// Bare parameter names follow identifier rules.
fn is_param_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
