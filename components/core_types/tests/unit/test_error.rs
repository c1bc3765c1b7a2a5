//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, SourcePosition};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_is_copy() {
        let kind = ErrorKind::LexError;
        let copy = kind;
        assert_eq!(kind, copy);
    }

    #[test]
    fn test_too_deep_is_not_a_syntax_failure() {
        assert!(!ErrorKind::TooDeep.is_syntax_failure());
    }

    #[test]
    fn test_internal_error_is_not_a_syntax_failure() {
        assert!(!ErrorKind::InternalError.is_syntax_failure());
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_error_with_position() {
        let pos = SourcePosition::new(1, 9, 8);
        let error = JsError::new(ErrorKind::LexError, "Unterminated string literal", Some(pos));

        assert_eq!(error.kind, ErrorKind::LexError);
        assert_eq!(error.source_position, Some(pos));
        assert_eq!(error.to_string(), "Unterminated string literal (1:9)");
    }

    #[test]
    fn test_error_without_position_displays_message_only() {
        let error = JsError::new(ErrorKind::InternalError, "boom", None);
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        let error = JsError::new(ErrorKind::SyntaxError, "x", None);
        takes_error(&error);
    }

    #[test]
    fn test_errors_compare_by_value() {
        let a = JsError::new(ErrorKind::SyntaxError, "x", Some(SourcePosition::start()));
        let b = JsError::new(ErrorKind::SyntaxError, "x", Some(SourcePosition::start()));
        assert_eq!(a, b);
    }
}
