use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_single_line() {
    let source = "a red cat";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_count(), 1);
    assert_eq!(table.offset_to_line_col(source, 6), (1, 7));
}

#[test]
fn test_offset_at_newline_belongs_to_previous_line() {
    let source = "ab\ncd";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 2), (1, 3));
    assert_eq!(table.offset_to_line_col(source, 3), (2, 1));
}

#[test]
fn test_columns_count_characters() {
    let source = "é$x";
    let table = LineOffsetTable::build(source);
    // 'é' is two bytes; `$` starts at byte 2 but is column 2.
    assert_eq!(table.offset_to_line_col(source, 2), (1, 2));
}

#[test]
fn test_line_text_strips_terminators() {
    let source = "first\r\nsecond\nthird";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_text(source, 1), "first");
    assert_eq!(table.line_text(source, 2), "second");
    assert_eq!(table.line_text(source, 3), "third");
}

#[test]
fn test_span_start_line_col() {
    assert_eq!(span_start_line_col("x\n  $y", Span::new(4, 6)), (2, 3));
}
