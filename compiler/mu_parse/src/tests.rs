use pretty_assertions::assert_eq;
use proptest::prelude::*;

use mu_diagnostic::ErrorCode;
use mu_ir::{Block, Delimiter, NodeKind, Span};

use super::*;

fn kinds(block: &Block) -> Vec<NodeKind> {
    block.iter().map(|n| n.kind.clone()).collect()
}

fn text(s: &str) -> NodeKind {
    NodeKind::Text(s.to_string())
}

fn ws() -> NodeKind {
    NodeKind::Whitespace(" ".to_string())
}

fn var(s: &str) -> NodeKind {
    NodeKind::Var(s.to_string())
}

fn parse_err(source: &str) -> ParseError {
    parse(source).unwrap_err()
}

#[test]
fn plain_text() {
    let block = parse("a red, fluffy cat").unwrap();
    assert_eq!(
        kinds(&block),
        vec![
            text("a"),
            ws(),
            text("red"),
            text(","),
            ws(),
            text("fluffy"),
            ws(),
            text("cat"),
        ]
    );
    assert_eq!(block.span, Span::new(0, 17));
}

#[test]
fn variable_reference() {
    let block = parse("a $color cat").unwrap();
    assert_eq!(
        kinds(&block),
        vec![text("a"), ws(), var("color"), ws(), text("cat")]
    );
}

#[test]
fn variable_definition_ends_at_semicolon() {
    let block = parse("$x = big red; $x").unwrap();
    let NodeKind::VarDef { name, value } = &block.nodes[0].kind else {
        panic!("expected a definition, got {:?}", block.nodes[0].kind);
    };
    assert_eq!(name, "x");
    assert_eq!(
        kinds(value.as_ref().unwrap()),
        vec![text("big"), ws(), text("red")]
    );
    assert_eq!(kinds(&block)[1..], [ws(), var("x")]);
}

#[test]
fn variable_definition_ends_at_newline() {
    let block = parse("$x = 1\nvalue $x").unwrap();
    assert!(matches!(block.nodes[0].kind, NodeKind::VarDef { .. }));
    assert_eq!(kinds(&block)[1..], [text("value"), ws(), var("x")]);
}

#[test]
fn variable_definition_at_end_of_block() {
    let block = parse("($x = 1)").unwrap();
    let NodeKind::Block { delimiter, body } = &block.nodes[0].kind else {
        panic!("expected a block");
    };
    assert_eq!(*delimiter, Delimiter::Paren);
    assert!(matches!(&body.nodes[0].kind, NodeKind::VarDef { name, .. } if name == "x"));
}

#[test]
fn empty_variable_definition() {
    let block = parse("$x =;").unwrap();
    assert_eq!(
        kinds(&block),
        vec![NodeKind::VarDef {
            name: "x".to_string(),
            value: None,
        }]
    );
}

#[test]
fn function_definition_with_defaults() {
    let block = parse("$add(a, b=1) = { <=a+b=> }").unwrap();
    assert_eq!(block.len(), 1);
    let NodeKind::FunctionDef(def) = &block.nodes[0].kind else {
        panic!("expected a function definition");
    };
    assert_eq!(def.name, "add");
    assert_eq!(def.params.len(), 2);
    assert_eq!(def.params[0].name, "a");
    assert!(!def.params[0].has_default());
    assert_eq!(def.params[1].name, "b");
    assert_eq!(
        kinds(def.params[1].default.as_ref().unwrap()),
        vec![text("1")]
    );
    assert_eq!(
        kinds(&def.body),
        vec![ws(), NodeKind::InlineExpr("a+b".to_string()), ws()]
    );
    assert_eq!(def.signature(), "$add($a, $b = 1)");
}

#[test]
fn function_definition_with_dollar_params() {
    let block = parse("$f($x, $y = $x) = {$x $y}").unwrap();
    let NodeKind::FunctionDef(def) = &block.nodes[0].kind else {
        panic!("expected a function definition");
    };
    assert_eq!(def.signature(), "$f($x, $y = ${x})");
}

#[test]
fn function_definition_without_params() {
    let block = parse("$hi() = {hello}").unwrap();
    let NodeKind::FunctionDef(def) = &block.nodes[0].kind else {
        panic!("expected a function definition");
    };
    assert!(def.params.is_empty());
    assert_eq!(kinds(&def.body), vec![text("hello")]);
}

#[test]
fn call_with_positional_and_named_args() {
    let block = parse("$f(one, $b = two)").unwrap();
    let NodeKind::Call { name, args } = &block.nodes[0].kind else {
        panic!("expected a call");
    };
    assert_eq!(name, "f");
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].name, None);
    assert_eq!(kinds(&args[0].value), vec![text("one")]);
    assert_eq!(args[1].name.as_deref(), Some("b"));
    assert_eq!(kinds(&args[1].value), vec![text("two")]);
}

#[test]
fn empty_call_has_no_args() {
    for source in ["$f()", "$f( )"] {
        let block = parse(source).unwrap();
        let NodeKind::Call { args, .. } = &block.nodes[0].kind else {
            panic!("expected a call");
        };
        assert!(args.is_empty(), "{source}");
    }
}

#[test]
fn call_that_looks_like_a_definition_falls_back() {
    let block = parse("$f(a b) = {x}").unwrap();
    assert!(matches!(&block.nodes[0].kind, NodeKind::Call { args, .. } if args.len() == 1));
    assert!(matches!(
        &block.nodes.last().unwrap().kind,
        NodeKind::Block {
            delimiter: Delimiter::Brace,
            ..
        }
    ));
}

#[test]
fn trailing_comma_in_parameter_list_is_a_call() {
    let block = parse("$f(a,) = {x}").unwrap();
    assert!(matches!(&block.nodes[0].kind, NodeKind::Call { args, .. } if args.len() == 2));
}

#[test]
fn definition_default_may_contain_calls_and_blocks() {
    let block = parse("$f(a = $g(1,{2}), b = (c, d)) = {$a}").unwrap();
    let NodeKind::FunctionDef(def) = &block.nodes[0].kind else {
        panic!("expected a function definition");
    };
    assert_eq!(def.signature(), "$f($a = $g(1, {2}), $b = (c, d))");
}

#[test]
fn deeply_nested_named_arguments_parse_once() {
    let depth = 200;
    let source = format!("{}x{}", "$f($a = ".repeat(depth), ")".repeat(depth));
    let block = parse(&source).unwrap();
    assert_eq!(block.len(), 1);
    assert_eq!(block.to_string(), source);
}

#[test]
fn nested_definition_inside_default() {
    let block = parse("$f(a = $g(b) = {$b}) = {$a}").unwrap();
    let NodeKind::FunctionDef(outer) = &block.nodes[0].kind else {
        panic!("expected a function definition");
    };
    let default = outer.params[0].default.as_ref().unwrap();
    assert!(matches!(&default.nodes[0].kind, NodeKind::FunctionDef(inner) if inner.name == "g"));
}

#[test]
fn space_before_paren_is_not_a_call() {
    let block = parse("$f (x)").unwrap();
    assert_eq!(kinds(&block)[0], var("f"));
    assert!(matches!(kinds(&block)[2], NodeKind::Block { .. }));
}

#[test]
fn bridge_call() {
    let block = parse("$(1 + 2, 3)").unwrap();
    let NodeKind::Call { name, args } = &block.nodes[0].kind else {
        panic!("expected a call");
    };
    assert_eq!(name, mu_ir::MAGIC_BRIDGE);
    assert_eq!(args.len(), 2);
    assert_eq!(kinds(&args[1].value), vec![ws(), text("3")]);
}

#[test]
fn nested_blocks_and_calls() {
    let block = parse("{a ($f((b)))}").unwrap();
    assert_eq!(block.to_string(), "{a ($f((b)))}");
}

#[test]
fn quoted_and_inline_expression() {
    let block = parse(r#""a, b" <= 2 * 3 =>"#).unwrap();
    assert_eq!(
        kinds(&block),
        vec![
            NodeKind::Quoted("a, b".to_string()),
            ws(),
            NodeKind::InlineExpr(" 2 * 3 ".to_string()),
        ]
    );
}

#[test]
fn unmatched_closer() {
    let err = parse_err("a)");
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(err.span(), Span::new(1, 2));
    assert_eq!(err.to_string(), "unmatched `)`");
}

#[test]
fn mismatched_closer_inside_block() {
    let err = parse_err("(a}");
    assert_eq!(
        err,
        ParseError::Unmatched {
            closer: '}',
            span: Span::new(2, 3),
        }
    );
}

#[test]
fn unclosed_block_points_at_opener() {
    let err = parse_err("x {a (b)");
    assert_eq!(err.code(), ErrorCode::E1003);
    assert_eq!(err.span(), Span::new(2, 3));
}

#[test]
fn unclosed_call() {
    let err = parse_err("$f(a, b");
    assert_eq!(
        err,
        ParseError::Unclosed {
            opener: '(',
            span: Span::new(2, 3),
        }
    );
}

#[test]
fn unclosed_function_body() {
    let err = parse_err("$f(a) = { $a");
    assert_eq!(err.code(), ErrorCode::E1003);
    assert_eq!(err.span(), Span::new(8, 9));
}

#[test]
fn bare_dollar() {
    let err = parse_err("costs $ 5");
    assert_eq!(err.code(), ErrorCode::E1002);
    assert_eq!(err.span(), Span::new(6, 7));
}

#[test]
fn diagnostic_renders_excerpt() {
    let source = "foo (bar";
    let rendered = parse_err(source).to_diagnostic().render(source);
    assert!(rendered.starts_with("error[E1003]: unclosed `(`"), "{rendered}");
    assert!(rendered.contains("1 | foo (bar"), "{rendered}");
}

#[test]
fn deep_nesting() {
    let depth = 500;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let block = parse(&source).unwrap();
    assert_eq!(block.to_string(), source);
}

proptest! {
    #[test]
    fn text_without_macro_syntax_round_trips(source in "[a-z0-9 ,;.!=\n\t-]{0,48}") {
        let block = parse(&source).unwrap();
        prop_assert_eq!(block.to_string(), source);
    }
}
