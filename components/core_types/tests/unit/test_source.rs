//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[test]
fn test_start_is_line_one_column_one() {
    let pos = SourcePosition::start();
    assert_eq!((pos.line, pos.column, pos.offset), (1, 1, 0));
}

#[test]
fn test_display_is_line_colon_column() {
    assert_eq!(SourcePosition::new(12, 3, 200).to_string(), "12:3");
}

#[test]
fn test_position_is_copy() {
    let a = SourcePosition::new(2, 2, 5);
    let b = a;
    assert_eq!(a, b);
}
