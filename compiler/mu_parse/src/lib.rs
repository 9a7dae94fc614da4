//! Parser for the Mu prompt macro language.
//!
//! Recursive descent over the token list from `mu_lexer`. Prompt text is
//! mostly literal, so everything that is not macro syntax comes through as
//! `Text`/`Whitespace`/`Newline` nodes and evaluates to itself.
//!
//! The one ambiguity in the grammar is `$name(...)`: it is a function
//! definition when the parenthesised list is a parameter list followed by
//! `= {`, otherwise a call. A token scan decides which before anything is
//! parsed, so nested argument lists are only ever parsed once.

mod cursor;
mod error;
mod grammar;

use mu_ir::{Block, Delimiter, Span};
use mu_lexer::TokenList;

pub use error::ParseError;

use cursor::Cursor;

/// Where a node sequence is being parsed; decides which tokens end it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Context {
    /// Closer that ends the sequence. Any other closer is unmatched.
    closer: Option<Delimiter>,
    /// `,` ends the sequence (call arguments, parameter defaults).
    comma: bool,
    /// `;` and newline end the sequence (variable initializers).
    statement: bool,
}

impl Context {
    const TOP: Context = Context {
        closer: None,
        comma: false,
        statement: false,
    };

    const ARGS: Context = Context {
        closer: Some(Delimiter::Paren),
        comma: true,
        statement: false,
    };

    fn block(delimiter: Delimiter) -> Context {
        Context {
            closer: Some(delimiter),
            comma: false,
            statement: false,
        }
    }

    /// Initializer of a definition made inside `outer`: stops wherever
    /// `outer` would, and also at `;` and newline.
    fn var_init(outer: Context) -> Context {
        Context {
            statement: true,
            ..outer
        }
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    /// Parse the whole token list as top-level prompt text.
    pub fn parse_prompt(&mut self) -> Result<Block, ParseError> {
        let nodes = self.parse_sequence(Context::TOP)?;
        let span = Span::new(0, self.cursor.current_span().end);
        Ok(Block::new(nodes, span))
    }
}

/// Parse macro text into a block.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Block, ParseError> {
    let tokens = mu_lexer::lex(source)?;
    let mut parser = Parser::new(&tokens);
    let block = parser.parse_prompt();
    match &block {
        Ok(block) => tracing::debug!(nodes = block.len(), "parsed macro text"),
        Err(err) => tracing::debug!(code = %err.code(), "macro syntax error: {err}"),
    }
    block
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
