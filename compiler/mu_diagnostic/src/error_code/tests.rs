use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2010.as_str(), "E2010");
}

#[test]
fn test_all_variants_classified() {
    for code in ErrorCode::ALL {
        let classes = [
            code.is_syntax_error(),
            code.is_eval_error(),
            code.is_expression_error(),
            code.is_wildcard_error(),
            code.as_str().starts_with("E5"),
        ];
        assert_eq!(
            classes.iter().filter(|c| **c).count(),
            1,
            "{code} must belong to exactly one stage"
        );
    }
}

#[test]
fn test_from_str_round_trips_every_code() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
}

#[test]
fn test_from_str_is_case_insensitive() {
    assert_eq!("e2001".parse::<ErrorCode>(), Ok(ErrorCode::E2001));
    assert!("E9999".parse::<ErrorCode>().is_err());
}

#[test]
fn test_every_code_has_description() {
    for code in ErrorCode::ALL {
        assert!(!code.description().is_empty());
    }
}
