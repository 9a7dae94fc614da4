//! Parse tree for the Mu macro language.
//!
//! A prompt is a [`Block`]: a flat sequence of [`Node`]s. Nested structure
//! (blocks, call arguments, function bodies) owns its own `Block`.
//!
//! `Display` reproduces surface syntax, which is what `$help()` prints for
//! parameter defaults and what `mu parse` shows alongside the tree.

use std::fmt;
use std::sync::Arc;

use crate::Span;

/// Name of the magic expression bridge, written `$(...)`.
pub const MAGIC_BRIDGE: &str = "$";

/// A sequence of nodes.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Block {
    pub nodes: Vec<Node>,
    pub span: Span,
}

impl Block {
    pub fn new(nodes: Vec<Node>, span: Span) -> Self {
        Block { nodes, span }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate the nodes in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// A parse tree node with its source span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    #[inline]
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    /// Whether this node only ever produces whitespace.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, NodeKind::Whitespace(_) | NodeKind::Newline)
    }
}

/// Node variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text run. Also carries prompt-level punctuation (`,` `;` `=`).
    Text(String),
    /// Horizontal whitespace.
    Whitespace(String),
    /// A line break that is not a definition terminator.
    Newline,
    /// Quoted literal, already unescaped.
    Quoted(String),
    /// `$name` or `${name}`.
    Var(String),
    /// `$name = value`. `None` binds the empty string.
    VarDef {
        name: String,
        value: Option<Arc<Block>>,
    },
    /// `$name(params) = { body }`.
    FunctionDef(Arc<FunctionDef>),
    /// `$name(args)`, or `$(args)` for the expression bridge.
    Call { name: String, args: Vec<Arg> },
    /// Parenthesised or braced block. Delimiters are part of the output.
    Block { delimiter: Delimiter, body: Block },
    /// `<= source =>`, evaluated by the expression language.
    InlineExpr(String),
}

/// Block delimiters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Paren,
    Brace,
}

impl Delimiter {
    pub const fn open(self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Brace => '{',
        }
    }

    pub const fn close(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Brace => '}',
        }
    }
}

/// A user function definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

impl FunctionDef {
    /// Render the signature as `$name($a, $b = default)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("${}({})", self.name, params.join(", "))
    }
}

/// A function parameter with an optional default expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub default: Option<Arc<Block>>,
    pub span: Span,
}

impl Param {
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            Some(default) => write!(f, "${} = {default}", self.name),
            None => write!(f, "${}", self.name),
        }
    }
}

/// A call-site argument. `name` is set for `$p = value` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Block,
    pub span: Span,
}

impl Arg {
    #[inline]
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "${name} = {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Whitespace(text) => f.write_str(text),
            NodeKind::Newline => f.write_str("\n"),
            NodeKind::Quoted(text) => write!(f, "\"{}\"", text.replace('"', "\\\"")),
            NodeKind::Var(name) => write!(f, "${{{name}}}"),
            NodeKind::VarDef { name, value } => match value {
                Some(value) => write!(f, "${name} = {value};"),
                None => write!(f, "${name} =;"),
            },
            NodeKind::FunctionDef(def) => write!(f, "{} = {{{}}}", def.signature(), def.body),
            NodeKind::Call { name, args } => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                if name == MAGIC_BRIDGE {
                    write!(f, "$({})", args.join(", "))
                } else {
                    write!(f, "${name}({})", args.join(", "))
                }
            }
            NodeKind::Block { delimiter, body } => {
                write!(f, "{}{body}{}", delimiter.open(), delimiter.close())
            }
            NodeKind::InlineExpr(source) => write!(f, "<={source}=>"),
        }
    }
}
