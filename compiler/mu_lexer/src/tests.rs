use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().iter().map(|t| t.kind.clone()).collect()
}

fn text(s: &str) -> TokenKind {
    TokenKind::Text(s.to_string())
}

fn ws(s: &str) -> TokenKind {
    TokenKind::Whitespace(s.to_string())
}

fn var(s: &str) -> TokenKind {
    TokenKind::Var(s.to_string())
}

#[test]
fn plain_prompt_is_text_and_whitespace() {
    assert_eq!(
        kinds("a cat, sitting"),
        vec![
            text("a"),
            ws(" "),
            text("cat"),
            TokenKind::Comma,
            ws(" "),
            text("sitting"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn variables_plain_and_braced() {
    assert_eq!(
        kinds("$x${y}z"),
        vec![var("x"), var("y"), text("z"), TokenKind::Eof]
    );
}

#[test]
fn lone_dollar_before_paren() {
    assert_eq!(
        kinds("$(1)"),
        vec![
            TokenKind::Dollar,
            TokenKind::LParen,
            text("1"),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dollar_followed_by_digit_is_not_a_variable() {
    assert_eq!(kinds("$1"), vec![TokenKind::Dollar, text("1"), TokenKind::Eof]);
}

#[test]
fn quoted_escapes() {
    assert_eq!(
        kinds(r#""say \"hi\"""#),
        vec![TokenKind::Quoted("say \"hi\"".to_string()), TokenKind::Eof]
    );
}

#[test]
fn empty_quotes_are_a_literal_quote() {
    assert_eq!(
        kinds(r#""""#),
        vec![TokenKind::Quoted("\"".to_string()), TokenKind::Eof]
    );
}

#[test]
fn unterminated_quote_is_text() {
    assert_eq!(
        kinds("\"abc"),
        vec![text("\""), text("abc"), TokenKind::Eof]
    );
}

#[test]
fn inline_expression() {
    assert_eq!(
        kinds("<= a + 1 =>!"),
        vec![
            TokenKind::InlineExpr(" a + 1 ".to_string()),
            text("!"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn inline_expression_may_contain_comparison_like_text() {
    assert_eq!(
        kinds("<=a >= b=>"),
        vec![TokenKind::InlineExpr("a >= b".to_string()), TokenKind::Eof]
    );
}

#[test]
fn inline_expression_without_spaces() {
    assert_eq!(
        kinds("{ <=a+b=> }"),
        vec![
            TokenKind::LBrace,
            ws(" "),
            TokenKind::InlineExpr("a+b".to_string()),
            ws(" "),
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("<=1=>"),
        vec![TokenKind::InlineExpr("1".to_string()), TokenKind::Eof]
    );
}

#[test]
fn inline_expression_with_equality_and_newlines() {
    assert_eq!(
        kinds("<= a == b\n =>"),
        vec![TokenKind::InlineExpr(" a == b\n ".to_string()), TokenKind::Eof]
    );
}

#[test]
fn unclosed_inline_expression_is_text() {
    assert_eq!(
        kinds("a <= b"),
        vec![text("a"), ws(" "), text("<="), ws(" "), text("b"), TokenKind::Eof]
    );
}

#[test]
fn stray_quote_inside_prompt_is_text() {
    assert_eq!(
        kinds("5\" tall $x"),
        vec![
            text("5"),
            text("\""),
            ws(" "),
            text("tall"),
            ws(" "),
            var("x"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn escaped_quote_does_not_close() {
    assert_eq!(
        kinds(r#""a\" b"#),
        vec![text("\""), text("a\\"), text("\""), ws(" "), text("b"), TokenKind::Eof]
    );
}

#[test]
fn lone_lt_is_text() {
    assert_eq!(
        kinds("a < b"),
        vec![text("a"), ws(" "), text("<"), ws(" "), text("b"), TokenKind::Eof]
    );
}

#[test]
fn crlf_is_one_newline() {
    assert_eq!(
        kinds("a\r\nb"),
        vec![text("a"), TokenKind::Newline, text("b"), TokenKind::Eof]
    );
}

#[test]
fn definition_punctuation() {
    assert_eq!(
        kinds("$f($a)={x};"),
        vec![
            var("f"),
            TokenKind::LParen,
            var("a"),
            TokenKind::RParen,
            TokenKind::Eq,
            TokenKind::LBrace,
            text("x"),
            TokenKind::RBrace,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_cover_the_source() {
    let tokens = lex("$ab cd").unwrap();
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert_eq!(tokens[1].span, Span::new(3, 4));
    assert_eq!(tokens[2].span, Span::new(4, 6));
    assert_eq!(tokens[3].span, Span::point(6));
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn cook_var_strips_dollar_and_braces() {
    assert_eq!(cook_var("$name"), "name");
    assert_eq!(cook_var("${name}"), "name");
}

#[test]
fn cook_quoted_keeps_unknown_escapes() {
    assert_eq!(cook_quoted(r#""a\nb""#), "a\\nb");
    assert_eq!(cook_quoted(r#""a\\b""#), "a\\b");
}

proptest! {
    #[test]
    fn lexing_never_fails_and_spans_are_contiguous(source in "\\PC{0,64}") {
        let tokens = lex(&source).unwrap();
        let mut offset = 0u32;
        for token in tokens.iter() {
            prop_assert_eq!(token.span.start, offset);
            offset = token.span.end;
        }
        prop_assert_eq!(offset as usize, source.len());
    }
}
