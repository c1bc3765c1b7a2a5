//! Contract tests for the parser API
//!
//! These tests exercise the public surface the way a collaborator would:
//! scanner with explicit goals, grammar engine verdicts, and driver outcomes.

use core_types::{ErrorKind, JsError};
use parser::{
    parse_buffer, BufferSource, CollectingSink, Driver, LexGoal, MemorySource, ParseOptions,
    ParseOutcome, Parser, Scanner, SourceType, TokenKind, Verdict,
};

// =============================================================================
// Scanner Contract Tests
// =============================================================================

#[test]
fn test_scanner_next_token_returns_result() {
    let mut scanner = Scanner::new("let x = 42;");
    let result: Result<_, JsError> = scanner.next_token(LexGoal::RegexAllowed);
    assert!(result.is_ok());
}

#[test]
fn test_scanner_goal_decides_slash() {
    let mut scanner = Scanner::new("/a/g");
    let token = scanner.next_token(LexGoal::RegexAllowed).unwrap();
    assert_eq!(token.kind, TokenKind::RegExp);

    let mut scanner = Scanner::new("/a/g");
    let token = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
    assert!(matches!(token.kind, TokenKind::Punctuator(_)));
}

#[test]
fn test_scanner_reports_newline_before() {
    let mut scanner = Scanner::new("a\nb");
    let first = scanner.next_token(LexGoal::RegexAllowed).unwrap();
    let second = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
    assert!(!first.newline_before);
    assert!(second.newline_before);
    assert_eq!(second.start.line, 2);
}

#[test]
fn test_scanner_lex_error_kind() {
    let mut scanner = Scanner::new("'open");
    let err = scanner.next_token(LexGoal::RegexAllowed).unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
}

// =============================================================================
// Grammar Engine Contract Tests
// =============================================================================

#[test]
fn test_parser_accepts() {
    let verdict = Parser::new("let x = 42;", ParseOptions::default()).parse();
    assert_eq!(verdict, Verdict::Accept);
    assert!(verdict.is_accept());
}

#[test]
fn test_parser_rejects_with_position() {
    let verdict = Parser::new("let x = ;", ParseOptions::default()).parse();
    let Verdict::Reject(err) = verdict else {
        panic!("expected a rejection");
    };
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    let position = err.source_position.unwrap();
    assert_eq!((position.line, position.column), (1, 9));
}

#[test]
fn test_parser_module_option() {
    let options = ParseOptions::default().with_source_type(SourceType::Module);
    assert!(Parser::new("export default 1;", options).parse().is_accept());
    assert!(!Parser::new("export default 1;", ParseOptions::default())
        .parse()
        .is_accept());
}

// =============================================================================
// Driver Contract Tests
// =============================================================================

#[test]
fn test_asi_properties() {
    assert_eq!(parse_buffer(b"a = 1\nb = 2"), ParseOutcome::Ok);
    assert_eq!(parse_buffer(b"function f() { return\na + b }"), ParseOutcome::Ok);
    assert_eq!(parse_buffer(b"function f() { return a + b }"), ParseOutcome::Ok);
}

#[test]
fn test_regex_division_properties() {
    assert_eq!(
        parse_buffer(b"var a = 4; var b = 2; var c = a /b/ g;"),
        ParseOutcome::Ok
    );
    assert_eq!(parse_buffer(b"a = b / g"), ParseOutcome::Ok);
    assert_eq!(parse_buffer(b"a = /b/g"), ParseOutcome::Ok);
}

#[test]
fn test_unterminated_literal_is_lex_error() {
    let outcome = parse_buffer(b"var s = 'abc");
    let record = outcome.error_record().unwrap();
    assert_eq!(record.kind, ErrorKind::LexError);
    assert_eq!((record.line, record.column), (1, 9));
}

#[test]
fn test_dangling_brace_reports_end_of_input() {
    let outcome = parse_buffer(b"function f() { ");
    assert!(matches!(outcome, ParseOutcome::SyntaxError(_)));
    let record = outcome.error_record().unwrap();
    assert_eq!((record.line, record.column), (1, 16));
}

#[test]
fn test_parse_source_uses_buffer_source() {
    let source = MemorySource::new("class A { #x; m() { return #x in this; } }");
    assert_eq!(source.name(), "<stdin>");
    assert_eq!(Driver::default().parse_source(&source), ParseOutcome::Ok);
}

#[test]
fn test_report_to_forwards_one_error() {
    let mut sink = CollectingSink::default();
    parse_buffer(b"if (").report_to(&mut sink);
    assert_eq!(sink.reports.len(), 1);
    let (line, column, message) = &sink.reports[0];
    assert_eq!((*line, *column), (1, 5));
    assert_eq!(message, "Unexpected end of input");
}

#[test]
fn test_deep_nesting_is_too_deep_not_a_crash() {
    let source = format!("{}0{}", "(".repeat(100_000), ")".repeat(100_000));
    let outcome = parse_buffer(source.as_bytes());
    assert!(matches!(outcome, ParseOutcome::TooDeep(_)));
}
