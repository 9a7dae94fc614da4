//! Call arguments and the expression bridge.

use mu_ir::{Arg, Block, Delimiter, Node, NodeKind, MAGIC_BRIDGE};
use mu_lexer::TokenKind;

use super::{nodes_span, trim_trailing_trivia};
use crate::{Context, ParseError, Parser};

impl Parser<'_> {
    /// `$( ... )`. A `$` not followed by `(` is an error.
    pub(crate) fn parse_bridge(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        if !self.cursor.check(&TokenKind::LParen) {
            return Err(ParseError::BareDollar { span: start });
        }
        let args = self.parse_args()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(Node::new(
            NodeKind::Call {
                name: MAGIC_BRIDGE.to_string(),
                args,
            },
            span,
        ))
    }

    /// `( arg, $name = arg, ... )`, cursor on the `(`.
    ///
    /// `()` and `( )` take no arguments.
    pub(crate) fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        let open = self.cursor.current_span();
        self.cursor.advance();

        let mut args = Vec::new();
        loop {
            let start = self.cursor.current_span();
            let name = self.parse_arg_name();
            let mut nodes = self.parse_sequence(Context::ARGS)?;
            if name.is_some() {
                trim_trailing_trivia(&mut nodes);
            }
            let span = nodes_span(&nodes, start.start).merge(start);
            args.push(Arg {
                name,
                value: Block::new(nodes, span),
                span,
            });

            match self.cursor.current_kind() {
                TokenKind::Comma => self.cursor.advance(),
                TokenKind::RParen => {
                    self.cursor.advance();
                    break;
                }
                _ => {
                    return Err(ParseError::Unclosed {
                        opener: Delimiter::Paren.open(),
                        span: open,
                    })
                }
            }
        }

        if let [only] = args.as_slice() {
            if !only.is_named() && only.value.iter().all(Node::is_trivia) {
                args.clear();
            }
        }
        Ok(args)
    }

    /// Consume `$name =` at the start of an argument, if present.
    fn parse_arg_name(&mut self) -> Option<String> {
        let snapshot = self.cursor.position();
        self.cursor.skip_trivia();
        if let TokenKind::Var(name) = self.cursor.current_kind() {
            if self.cursor.next_significant_is(&TokenKind::Eq) {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                self.cursor.advance();
                self.cursor.skip_whitespace();
                return Some(name.clone());
            }
        }
        self.cursor.set_position(snapshot);
        None
    }
}
