//! Pratt parser for expressions.

use mu_stack::ensure_sufficient_stack;

use crate::ast::{BinaryOp, Expr, UnaryOp, PREFIX_BP};
use crate::lexer::{lex, Token};
use crate::{ExprError, Value};

/// Parse a complete expression.
pub fn parse_expression(source: &str) -> Result<Expr, ExprError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;
    if !parser.check(&Token::Eof) {
        return Err(parser.unexpected("end of expression"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].1
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: &Token) -> Result<(), ExprError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&token.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        ExprError::syntax(
            format!("expected {expected}, found {}", self.current().describe()),
            self.offset(),
        )
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ExprError> {
        ensure_sufficient_stack(|| self.parse_expr_inner(min_bp))
    }

    fn parse_expr_inner(&mut self, min_bp: u8) -> Result<Expr, ExprError> {
        let mut left = self.parse_prefix()?;

        while let Some(op) = self.binary_op() {
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let right = self.parse_expr(r_bp)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        Some(match self.current() {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::SlashSlash => BinaryOp::FloorDiv,
            Token::Percent => BinaryOp::Mod,
            Token::StarStar => BinaryOp::Pow,
            Token::Tilde => BinaryOp::Concat,
            _ => return None,
        })
    }

    fn parse_prefix(&mut self) -> Result<Expr, ExprError> {
        let op = match self.current() {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Plus => Some(UnaryOp::Pos),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_expr(PREFIX_BP)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    /// A primary followed by any number of `[index]` suffixes.
    fn parse_postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_primary()?;
        while self.check(&Token::LBracket) {
            self.advance();
            let index = self.parse_expr(0)?;
            self.expect(&Token::RBracket)?;
            expr = Expr::Index {
                target: Box::new(expr),
                index: Box::new(index),
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        match self.current().clone() {
            Token::Int(i) => {
                self.advance();
                Ok(Expr::Literal(Value::Int(i)))
            }
            Token::Float(f) => {
                self.advance();
                Ok(Expr::Literal(Value::Float(f)))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Value::Str(s)))
            }
            Token::Ident(name) => {
                self.advance();
                if self.check(&Token::LParen) {
                    self.parse_call(name)
                } else {
                    Ok(Expr::Name(name))
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => {
                self.advance();
                let items = self.parse_list_items(&Token::RBracket)?;
                Ok(Expr::List(items))
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    /// `name(args, key = value)`, cursor on the `(`.
    fn parse_call(&mut self, name: String) -> Result<Expr, ExprError> {
        self.advance();
        let mut args = Vec::new();
        let mut kwargs = Vec::new();
        while !self.check(&Token::RParen) {
            let is_keyword = matches!(self.current(), Token::Ident(_))
                && self.tokens.get(self.pos + 1).map(|(t, _)| t) == Some(&Token::Eq);
            if is_keyword {
                let Token::Ident(key) = self.advance() else {
                    return Err(self.unexpected("keyword"));
                };
                self.advance();
                kwargs.push((key, self.parse_expr(0)?));
            } else if kwargs.is_empty() {
                args.push(self.parse_expr(0)?);
            } else {
                return Err(ExprError::syntax(
                    "positional argument after keyword argument",
                    self.offset(),
                ));
            }
            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&Token::RParen)?;
        Ok(Expr::Call { name, args, kwargs })
    }

    fn parse_list_items(&mut self, closer: &Token) -> Result<Vec<Expr>, ExprError> {
        let mut items = Vec::new();
        while !self.check(closer) {
            items.push(self.parse_expr(0)?);
            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(closer)?;
        Ok(items)
    }
}
